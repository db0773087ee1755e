//! Collection Mutator: append, set-field and remove over any collection.
//!
//! All three collections go through the same generic code. A collection is
//! selected either statically through a [`CollectionKind`] marker type or
//! dynamically through [`CollectionName`]; the dynamic path only picks the
//! marker and then calls the generic operation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use tracing::debug;

use crate::draft::fields::{ExperienceField, ItemField, QualificationField, TimeSlotField};
use crate::draft::{Collection, DraftRecord, DraftStore, EntryToken};
use crate::errors::EditError;
use crate::models::{Experience, Qualification, TimeSlot, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Qualifications,
    Experiences,
    TimeSlots,
}

impl CollectionName {
    pub const ALL: [CollectionName; 3] = [
        CollectionName::Qualifications,
        CollectionName::Experiences,
        CollectionName::TimeSlots,
    ];

    /// Field name on the wire and in the draft payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Qualifications => "qualifications",
            CollectionName::Experiences => "experiences",
            CollectionName::TimeSlots => "timeSlots",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EditError::UnknownCollection(s.to_string()))
    }
}

/// Static description of one collection field of [`DraftRecord`].
pub trait CollectionKind {
    const NAME: CollectionName;

    type Item: Clone + fmt::Debug + PartialEq;
    type Field: ItemField<Self::Item>;

    /// The pre-filled element appended by the "add" action.
    fn template() -> Self::Item;

    fn of(record: &DraftRecord) -> &Collection<Self::Item>;

    fn of_mut(record: &mut DraftRecord) -> &mut Collection<Self::Item>;
}

pub struct Qualifications;
pub struct Experiences;
pub struct TimeSlots;

impl CollectionKind for Qualifications {
    const NAME: CollectionName = CollectionName::Qualifications;
    type Item = Qualification;
    type Field = QualificationField;

    fn template() -> Qualification {
        Qualification {
            starting_date: None,
            ending_date: None,
            degree: "PHD".to_string(),
            university: "Mercy Hospital".to_string(),
        }
    }

    fn of(record: &DraftRecord) -> &Collection<Qualification> {
        &record.qualifications
    }

    fn of_mut(record: &mut DraftRecord) -> &mut Collection<Qualification> {
        &mut record.qualifications
    }
}

impl CollectionKind for Experiences {
    const NAME: CollectionName = CollectionName::Experiences;
    type Item = Experience;
    type Field = ExperienceField;

    fn template() -> Experience {
        Experience {
            starting_date: None,
            ending_date: None,
            position: "Senior Surgeon".to_string(),
            hospital: "Mercy Hospital".to_string(),
        }
    }

    fn of(record: &DraftRecord) -> &Collection<Experience> {
        &record.experiences
    }

    fn of_mut(record: &mut DraftRecord) -> &mut Collection<Experience> {
        &mut record.experiences
    }
}

impl CollectionKind for TimeSlots {
    const NAME: CollectionName = CollectionName::TimeSlots;
    type Item = TimeSlot;
    type Field = TimeSlotField;

    fn template() -> TimeSlot {
        TimeSlot {
            day: Weekday::Sunday,
            starting_time: NaiveTime::from_hms_opt(10, 0, 0),
            ending_time: NaiveTime::from_hms_opt(4, 30, 0),
        }
    }

    fn of(record: &DraftRecord) -> &Collection<TimeSlot> {
        &record.time_slots
    }

    fn of_mut(record: &mut DraftRecord) -> &mut Collection<TimeSlot> {
        &mut record.time_slots
    }
}

/// Binds `$kind` to the marker type for `$name` and evaluates `$body`.
macro_rules! with_collection {
    ($name:expr, $kind:ident => $body:expr) => {
        match $name {
            CollectionName::Qualifications => {
                type $kind = Qualifications;
                $body
            }
            CollectionName::Experiences => {
                type $kind = Experiences;
                $body
            }
            CollectionName::TimeSlots => {
                type $kind = TimeSlots;
                $body
            }
        }
    };
}

impl DraftStore {
    pub fn collection<C: CollectionKind>(&self) -> &Collection<C::Item> {
        C::of(self.record())
    }

    /// Appends `template` to the end of collection `C` and returns its token.
    pub fn append<C: CollectionKind>(&mut self, template: C::Item) -> EntryToken {
        let (record, tokens) = self.parts_mut();
        let token = tokens.issue();
        let collection = C::of_mut(record);
        collection.push(token, template);
        debug!(collection = %C::NAME, len = collection.len(), "appended entry {token}");
        token
    }

    /// Overwrites one field of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a current position in `C`. Callers only ever
    /// hold indices of rendered elements.
    pub fn set_field<C: CollectionKind>(&mut self, index: usize, field: C::Field) {
        let collection = C::of_mut(self.record_mut());
        let len = collection.len();
        match collection.get_mut(index) {
            Some(item) => field.apply(item),
            None => panic!("{} index {index} out of range (len {len})", C::NAME),
        }
    }

    /// Removes the element at `index`; later elements move down one position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a current position in `C`.
    pub fn remove<C: CollectionKind>(&mut self, index: usize) -> C::Item {
        let collection = C::of_mut(self.record_mut());
        let len = collection.len();
        match collection.remove(index) {
            Some(item) => {
                debug!(collection = %C::NAME, index, "removed entry");
                item
            }
            None => panic!("{} index {index} out of range (len {len})", C::NAME),
        }
    }

    pub fn try_set_field<C: CollectionKind>(
        &mut self,
        index: usize,
        field: C::Field,
    ) -> Result<(), EditError> {
        let collection = C::of_mut(self.record_mut());
        let len = collection.len();
        let item = collection
            .get_mut(index)
            .ok_or_else(|| out_of_range(C::NAME, index, len))?;
        field.apply(item);
        Ok(())
    }

    pub fn try_remove<C: CollectionKind>(&mut self, index: usize) -> Result<C::Item, EditError> {
        let collection = C::of_mut(self.record_mut());
        let len = collection.len();
        collection
            .remove(index)
            .ok_or_else(|| out_of_range(C::NAME, index, len))
    }

    /// Edits the element carrying `token`, wherever it currently sits.
    pub fn set_field_by_token<C: CollectionKind>(
        &mut self,
        token: EntryToken,
        field: C::Field,
    ) -> Result<(), EditError> {
        let index = self.locate::<C>(token)?;
        self.try_set_field::<C>(index, field)
    }

    pub fn remove_by_token<C: CollectionKind>(
        &mut self,
        token: EntryToken,
    ) -> Result<C::Item, EditError> {
        let index = self.locate::<C>(token)?;
        self.try_remove::<C>(index)
    }

    fn locate<C: CollectionKind>(&self, token: EntryToken) -> Result<usize, EditError> {
        self.collection::<C>()
            .position(token)
            .ok_or_else(|| EditError::UnknownEntry {
                collection: C::NAME.to_string(),
                token: token.value(),
            })
    }

    // Name-driven entry points. Each one only selects the marker type.

    pub fn len_of(&self, name: CollectionName) -> usize {
        with_collection!(name, K => self.collection::<K>().len())
    }

    /// Appends the default template of the named collection.
    pub fn append_template(&mut self, name: CollectionName) -> EntryToken {
        with_collection!(name, K => self.append::<K>(K::template()))
    }

    /// Form-style edit: `collection[index].field = value`.
    pub fn set_field_raw(
        &mut self,
        name: CollectionName,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), EditError> {
        with_collection!(name, K => {
            let edit = <<K as CollectionKind>::Field as ItemField<_>>::parse(field, value)?;
            self.try_set_field::<K>(index, edit)
        })
    }

    pub fn remove_at(&mut self, name: CollectionName, index: usize) -> Result<(), EditError> {
        with_collection!(name, K => self.try_remove::<K>(index).map(drop))
    }
}

fn out_of_range(name: CollectionName, index: usize, len: usize) -> EditError {
    EditError::IndexOutOfRange {
        collection: name.to_string(),
        index,
        len,
    }
}

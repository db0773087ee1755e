//! Draft Store: the in-memory, not-yet-persisted copy of a profile.
//!
//! The store is owned by one editing session. Hydration replaces it
//! wholesale; user actions mutate it in place through the collection mutator
//! (`collections`) and the scalar setters below.

pub mod collections;
pub mod fields;
pub mod hydrate;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::EditError;
use crate::models::{Experience, Gender, Qualification, Specialization, TimeSlot};

pub use collections::{CollectionKind, CollectionName, Experiences, Qualifications, TimeSlots};
pub use fields::{
    ExperienceField, ItemField, ProfileEdit, QualificationField, TicketPrice, TimeSlotField,
};
pub use hydrate::Hydrator;

/// Opaque per-element token. Tokens are issued in increasing order by the
/// owning store and are never reused, so a token held across a removal keeps
/// pointing at the same element (or at nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryToken(u64);

impl EntryToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TokenSource {
    next: u64,
}

impl TokenSource {
    pub(crate) fn issue(&mut self) -> EntryToken {
        let token = EntryToken(self.next);
        self.next += 1;
        token
    }
}

#[derive(Debug, Clone)]
pub struct Entry<T> {
    token: EntryToken,
    item: T,
}

impl<T> Entry<T> {
    pub fn token(&self) -> EntryToken {
        self.token
    }

    pub fn item(&self) -> &T {
        &self.item
    }
}

/// Ordered sub-records of one shape. Position is the public identity.
///
/// Equality and serialization look at the items only; tokens are bookkeeping
/// and never leave the process.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            entries: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    pub(crate) fn from_items(items: Vec<T>, tokens: &mut TokenSource) -> Self {
        Collection {
            entries: items
                .into_iter()
                .map(|item| Entry {
                    token: tokens.issue(),
                    item,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn token_at(&self, index: usize) -> Option<EntryToken> {
        self.entries.get(index).map(|e| e.token)
    }

    /// Current position of the element carrying `token`.
    pub fn position(&self, token: EntryToken) -> Option<usize> {
        self.entries.iter().position(|e| e.token == token)
    }

    pub(crate) fn push(&mut self, token: EntryToken, item: T) {
        self.entries.push(Entry { token, item });
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|e| &mut e.item)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.entries.len()).then(|| self.entries.remove(index).item)
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// The editable profile aggregate. Serializes to exactly the body of a
/// profile update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) bio: String,
    pub(crate) gender: Gender,
    pub(crate) specialization: Specialization,
    pub(crate) ticket_price: TicketPrice,
    pub(crate) qualifications: Collection<Qualification>,
    pub(crate) experiences: Collection<Experience>,
    pub(crate) time_slots: Collection<TimeSlot>,
    pub(crate) about: String,
    pub(crate) photo: Option<String>,
}

impl DraftRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn specialization(&self) -> Specialization {
        self.specialization
    }

    pub fn ticket_price(&self) -> f64 {
        self.ticket_price.value()
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn qualifications(&self) -> &Collection<Qualification> {
        &self.qualifications
    }

    pub fn experiences(&self) -> &Collection<Experience> {
        &self.experiences
    }

    pub fn time_slots(&self) -> &Collection<TimeSlot> {
        &self.time_slots
    }
}

/// Owner of the single mutable draft for an editing session.
#[derive(Debug, Default)]
pub struct DraftStore {
    record: DraftRecord,
    tokens: TokenSource,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &DraftRecord {
        &self.record
    }

    /// Applies a typed scalar edit. Email is not representable here.
    pub fn set_scalar(&mut self, edit: ProfileEdit) {
        edit.apply(&mut self.record);
    }

    /// Applies a form-style `name = value` scalar edit.
    pub fn set_scalar_raw(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        let edit = ProfileEdit::parse(field, value)?;
        self.set_scalar(edit);
        Ok(())
    }

    pub(crate) fn set_photo(&mut self, url: String) {
        self.record.photo = Some(url);
    }

    pub(crate) fn replace_with(&mut self, build: impl FnOnce(&mut TokenSource) -> DraftRecord) {
        self.record = build(&mut self.tokens);
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut DraftRecord, &mut TokenSource) {
        (&mut self.record, &mut self.tokens)
    }

    pub(crate) fn record_mut(&mut self) -> &mut DraftRecord {
        &mut self.record
    }
}

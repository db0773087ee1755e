//! Hydrator: projects an external source record into the draft.

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::draft::{Collection, DraftRecord, DraftStore, TicketPrice, TokenSource};
use crate::models::DoctorRecord;

/// Builds a fresh draft from `source`, taking a fixed field list.
/// Anything missing, including the whole source, becomes a blank value.
pub(crate) fn project(source: Option<&DoctorRecord>, tokens: &mut TokenSource) -> DraftRecord {
    let Some(source) = source else {
        return DraftRecord::default();
    };

    DraftRecord {
        name: source.name.clone().unwrap_or_default(),
        email: source.email.clone().unwrap_or_default(),
        phone: source.phone.clone().unwrap_or_default(),
        bio: source.bio.clone().unwrap_or_default(),
        gender: source.gender.unwrap_or_default(),
        specialization: source.specialization.unwrap_or_default(),
        ticket_price: project_price(source.ticket_price),
        qualifications: Collection::from_items(
            source.qualifications.clone().unwrap_or_default(),
            tokens,
        ),
        experiences: Collection::from_items(source.experiences.clone().unwrap_or_default(), tokens),
        time_slots: Collection::from_items(source.time_slots.clone().unwrap_or_default(), tokens),
        about: source.about.clone().unwrap_or_default(),
        photo: source.photo.clone(),
    }
}

fn project_price(stored: Option<f64>) -> TicketPrice {
    match stored.map(TicketPrice::new) {
        None => TicketPrice::ZERO,
        Some(Ok(price)) => price,
        Some(Err(e)) => {
            warn!("stored ticket price ignored: {e}");
            TicketPrice::ZERO
        }
    }
}

/// Identity of the last source the draft was hydrated from.
///
/// Records are compared by allocation, not by content: handing over a new
/// `Arc` rehydrates even if it holds equal data. The `Weak` keeps the
/// allocation reserved so its address cannot be reused by a later record.
#[derive(Debug)]
enum SourceIdentity {
    Absent,
    Record(Weak<DoctorRecord>),
}

impl SourceIdentity {
    fn of(source: Option<&Arc<DoctorRecord>>) -> Self {
        match source {
            None => SourceIdentity::Absent,
            Some(record) => SourceIdentity::Record(Arc::downgrade(record)),
        }
    }

    fn is(&self, source: Option<&Arc<DoctorRecord>>) -> bool {
        match (self, source) {
            (SourceIdentity::Absent, None) => true,
            (SourceIdentity::Record(seen), Some(record)) => {
                Weak::ptr_eq(seen, &Arc::downgrade(record))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Hydrator {
    last: Option<SourceIdentity>,
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates `store` if `source` differs from the last observed source.
    /// Returns whether the draft was replaced.
    ///
    /// Replacement is wholesale: unsaved edits are discarded.
    pub fn observe(&mut self, source: Option<&Arc<DoctorRecord>>, store: &mut DraftStore) -> bool {
        if self.last.as_ref().is_some_and(|last| last.is(source)) {
            return false;
        }

        store.replace_with(|tokens| project(source.map(Arc::as_ref), tokens));
        self.last = Some(SourceIdentity::of(source));

        let record = store.record();
        debug!(
            source = source.map(|s| s.id.as_str()).unwrap_or("<absent>"),
            qualifications = record.qualifications.len(),
            experiences = record.experiences.len(),
            time_slots = record.time_slots.len(),
            "hydrated draft"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{CollectionName, ProfileEdit};
    use crate::models::{DoctorId, Gender, Qualification};

    fn source(name: &str, phone: Option<&str>) -> Arc<DoctorRecord> {
        Arc::new(DoctorRecord {
            id: DoctorId::new("doc-1"),
            name: Some(name.to_string()),
            email: Some("doc@example.com".to_string()),
            phone: phone.map(str::to_string),
            gender: Some(Gender::Female),
            ticket_price: Some(100.0),
            qualifications: Some(vec![Qualification {
                degree: "MBBS".to_string(),
                university: "Dhaka Medical College".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        })
    }

    #[test]
    fn test_absent_source_yields_blank_draft() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();
        store.set_scalar(ProfileEdit::Name("stale".to_string()));

        assert!(hydrator.observe(None, &mut store));
        assert_eq!(store.record(), &DraftRecord::default());
        assert!(store.record().time_slots().is_empty());
        assert_eq!(store.record().ticket_price(), 0.0);

        assert!(!hydrator.observe(None, &mut store));
    }

    #[test]
    fn test_same_source_hydrates_once() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();
        let record = source("Dr. Rahman", Some("0123"));

        assert!(hydrator.observe(Some(&record), &mut store));
        let first = store.record().clone();
        store.set_scalar(ProfileEdit::Bio("edited".to_string()));

        assert!(!hydrator.observe(Some(&record), &mut store));
        assert_eq!(store.record().bio(), "edited");
        assert_eq!(store.record().name(), first.name());
    }

    #[test]
    fn test_hydration_is_idempotent_per_source_content() {
        let record = source("Dr. Rahman", Some("0123"));

        let mut a = DraftStore::new();
        let mut b = DraftStore::new();
        Hydrator::new().observe(Some(&record), &mut a);
        Hydrator::new().observe(Some(&record), &mut b);
        assert_eq!(a.record(), b.record());
    }

    #[test]
    fn test_new_source_replaces_everything() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();

        hydrator.observe(Some(&source("Dr. Rahman", Some("0123"))), &mut store);
        store.append_template(CollectionName::Experiences);

        let replacement = source("Dr. Karim", None);
        assert!(hydrator.observe(Some(&replacement), &mut store));

        let record = store.record();
        assert_eq!(record.name(), "Dr. Karim");
        assert_eq!(record.phone(), "");
        assert!(record.experiences().is_empty());
        assert_eq!(record.qualifications().len(), 1);
    }

    #[test]
    fn test_equal_content_in_new_allocation_rehydrates() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();
        let record = source("Dr. Rahman", None);

        hydrator.observe(Some(&record), &mut store);
        store.set_scalar(ProfileEdit::Name("unsaved".to_string()));

        let refetched = Arc::new(record.as_ref().clone());
        assert!(hydrator.observe(Some(&refetched), &mut store));
        assert_eq!(store.record().name(), "Dr. Rahman");
    }

    #[test]
    fn test_source_going_absent_blanks_draft() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();
        hydrator.observe(Some(&source("Dr. Rahman", None)), &mut store);

        assert!(hydrator.observe(None, &mut store));
        assert_eq!(store.record().name(), "");
        assert!(store.record().qualifications().is_empty());
    }

    #[test]
    fn test_invalid_stored_price_projects_as_zero() {
        let mut hydrator = Hydrator::new();
        let mut store = DraftStore::new();
        let record = Arc::new(DoctorRecord {
            ticket_price: Some(-40.0),
            ..source("Dr. Rahman", None).as_ref().clone()
        });

        hydrator.observe(Some(&record), &mut store);
        assert_eq!(store.record().ticket_price(), 0.0);
        assert_eq!(store.record().name(), "Dr. Rahman");
    }
}

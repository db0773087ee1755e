use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;

use crate::draft::{
    CollectionKind, CollectionName, DraftRecord, DraftStore, Hydrator, ProfileEdit, Qualifications,
};
use crate::models::{DoctorId, DoctorRecord, Experience, Qualification, TimeSlot, Weekday};

fn seeded_store() -> DraftStore {
    let source = Arc::new(DoctorRecord {
        id: DoctorId::new("doc-7"),
        name: Some("Dr. Seed".to_string()),
        phone: Some("0171".to_string()),
        qualifications: Some(vec![Qualification {
            degree: "MBBS".to_string(),
            ..Default::default()
        }]),
        experiences: Some(vec![
            Experience {
                position: "Intern".to_string(),
                ..Default::default()
            },
            Experience {
                position: "Registrar".to_string(),
                ..Default::default()
            },
        ]),
        time_slots: Some(vec![TimeSlot {
            day: Weekday::Monday,
            ..Default::default()
        }]),
        ..Default::default()
    });
    let mut store = DraftStore::new();
    Hydrator::new().observe(Some(&source), &mut store);
    store
}

fn payload(record: &DraftRecord) -> serde_json::Map<String, Value> {
    match serde_json::to_value(record).unwrap() {
        Value::Object(map) => map,
        other => panic!("draft serialized to {other}"),
    }
}

fn scalars(record: &DraftRecord) -> serde_json::Map<String, Value> {
    let mut map = payload(record);
    for name in CollectionName::ALL {
        map.remove(name.as_str());
    }
    map
}

#[derive(Debug, Clone)]
enum Op {
    Append(CollectionName),
    SetField(CollectionName, usize, u32),
    Remove(CollectionName, usize),
}

impl Op {
    fn target(&self) -> CollectionName {
        match self {
            Op::Append(name) | Op::SetField(name, ..) | Op::Remove(name, _) => *name,
        }
    }

    fn apply(&self, store: &mut DraftStore) {
        match *self {
            Op::Append(name) => {
                store.append_template(name);
            }
            Op::SetField(name, index, seed) => {
                let len = store.len_of(name);
                if len == 0 {
                    return;
                }
                let (field, value) = match name {
                    CollectionName::Qualifications => ("university", format!("uni-{seed}")),
                    CollectionName::Experiences => ("hospital", format!("hospital-{seed}")),
                    CollectionName::TimeSlots => {
                        ("startingTime", format!("{:02}:{:02}", seed % 24, seed % 60))
                    }
                };
                store
                    .set_field_raw(name, index % len, field, &value)
                    .unwrap();
            }
            Op::Remove(name, index) => {
                let len = store.len_of(name);
                if len > 0 {
                    store.remove_at(name, index % len).unwrap();
                }
            }
        }
    }
}

fn arb_collection() -> impl Strategy<Value = CollectionName> {
    prop_oneof![
        Just(CollectionName::Qualifications),
        Just(CollectionName::Experiences),
        Just(CollectionName::TimeSlots),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_collection().prop_map(Op::Append),
        (arb_collection(), 0usize..8, any::<u32>())
            .prop_map(|(name, index, seed)| Op::SetField(name, index, seed)),
        (arb_collection(), 0usize..8).prop_map(|(name, index)| Op::Remove(name, index)),
    ]
}

proptest! {
    #[test]
    fn test_operations_leave_other_fields_untouched(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut store = seeded_store();
        for op in ops {
            let before = payload(store.record());
            let before_scalars = scalars(store.record());

            op.apply(&mut store);

            let after = payload(store.record());
            for other in CollectionName::ALL.into_iter().filter(|name| *name != op.target()) {
                prop_assert_eq!(&before[other.as_str()], &after[other.as_str()]);
            }
            prop_assert_eq!(before_scalars, scalars(store.record()));
        }
    }

    #[test]
    fn test_append_grows_by_one_and_keeps_prefix(
        ops in prop::collection::vec(arb_op(), 0..30),
        target in arb_collection(),
    ) {
        let mut store = seeded_store();
        for op in &ops {
            op.apply(&mut store);
        }

        let before = payload(store.record())[target.as_str()].clone();
        let before_len = store.len_of(target);

        store.append_template(target);

        prop_assert_eq!(store.len_of(target), before_len + 1);
        let after = payload(store.record())[target.as_str()].clone();
        let (before, after) = (before.as_array().unwrap(), after.as_array().unwrap());
        prop_assert_eq!(&after[..before_len], &before[..]);
    }
}

#[test]
fn test_scenario_append_then_remove_original() {
    let source = Arc::new(DoctorRecord {
        id: DoctorId::new("doc-1"),
        qualifications: Some(vec![Qualification {
            degree: "MBBS".to_string(),
            university: "Dhaka Medical College".to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    });
    let mut store = DraftStore::new();
    Hydrator::new().observe(Some(&source), &mut store);

    store.append::<Qualifications>(Qualifications::template());
    assert_eq!(store.len_of(CollectionName::Qualifications), 2);

    store.remove::<Qualifications>(0);
    let remaining = store.collection::<Qualifications>();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.get(0), Some(&Qualifications::template()));
}

#[test]
fn test_payload_has_exactly_the_draft_fields() {
    let mut store = seeded_store();
    store.set_scalar(ProfileEdit::Name("Jane".to_string()));

    let map = payload(store.record());
    let mut keys: Vec<_> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "about",
            "bio",
            "email",
            "experiences",
            "gender",
            "name",
            "phone",
            "photo",
            "qualifications",
            "specialization",
            "ticketPrice",
            "timeSlots",
        ]
    );
    assert_eq!(map["name"], "Jane");
    assert_eq!(map["experiences"][1]["position"], "Registrar");
    assert_eq!(map["timeSlots"][0]["day"], "monday");
    assert_eq!(map["timeSlots"][0]["startingTime"], "");
    assert_eq!(map["photo"], Value::Null);
}

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::wire::{
    blank_date, blank_time, lenient_choice, lenient_number, lenient_string, lenient_variant,
};

/// Opaque durable identifier of a stored doctor profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new(id: impl Into<String>) -> Self {
        DoctorId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Surgeon,
    Neurologist,
    Dermatologist,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(alias = "Saturday")]
    Saturday,
    #[serde(alias = "Sunday")]
    Sunday,
    #[serde(alias = "Monday")]
    Monday,
    #[serde(alias = "Tuesday")]
    Tuesday,
    #[serde(alias = "Wednesday")]
    Wednesday,
    #[serde(alias = "Thursday")]
    Thursday,
    #[serde(alias = "Friday")]
    Friday,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualification {
    #[serde(default, with = "blank_date")]
    pub starting_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub ending_date: Option<NaiveDate>,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub university: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, with = "blank_date")]
    pub starting_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub ending_date: Option<NaiveDate>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub hospital: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, deserialize_with = "lenient_variant")]
    pub day: Weekday,
    #[serde(default, with = "blank_time")]
    pub starting_time: Option<NaiveTime>,
    #[serde(default, with = "blank_time")]
    pub ending_time: Option<NaiveTime>,
}

/// The stored profile as handed over by whoever fetched it.
///
/// Every field is optional: the record may be partial, and the draft fills the
/// gaps with blanks. A stored value the editor cannot read (an unknown
/// selection, a date in another format) is dropped on its own. Fields the
/// editor does not project (password, role, reviews, ...) are ignored on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: DoctorId,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_choice")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient_choice")]
    pub specialization: Option<Specialization>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ticket_price: Option<f64>,
    pub qualifications: Option<Vec<Qualification>>,
    pub experiences: Option<Vec<Experience>>,
    pub time_slots: Option<Vec<TimeSlot>>,
    pub about: Option<String>,
    pub photo: Option<String>,
}

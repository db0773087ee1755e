//! Closed field sets for every editable shape.
//!
//! Each variant carries the new value, so a typed edit can only name a field
//! that exists on its shape. `parse` is the string-keyed entry point used by
//! form-driven callers; names outside the shape are rejected there.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::draft::DraftRecord;
use crate::errors::EditError;
use crate::models::wire::{parse_date, parse_time, parse_variant};
use crate::models::{Experience, Gender, Qualification, Specialization, TimeSlot, Weekday};

/// A single-field edit for one sub-record shape.
pub trait ItemField<T>: Sized {
    fn apply(self, item: &mut T);

    fn parse(field: &str, value: &str) -> Result<Self, EditError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum QualificationField {
    StartingDate(Option<NaiveDate>),
    EndingDate(Option<NaiveDate>),
    Degree(String),
    University(String),
}

impl ItemField<Qualification> for QualificationField {
    fn apply(self, item: &mut Qualification) {
        match self {
            QualificationField::StartingDate(v) => item.starting_date = v,
            QualificationField::EndingDate(v) => item.ending_date = v,
            QualificationField::Degree(v) => item.degree = v,
            QualificationField::University(v) => item.university = v,
        }
    }

    fn parse(field: &str, value: &str) -> Result<Self, EditError> {
        Ok(match field {
            "startingDate" => QualificationField::StartingDate(blank_or_date(field, value)?),
            "endingDate" => QualificationField::EndingDate(blank_or_date(field, value)?),
            "degree" => QualificationField::Degree(value.to_string()),
            "university" => QualificationField::University(value.to_string()),
            _ => return Err(unknown("qualifications", field)),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExperienceField {
    StartingDate(Option<NaiveDate>),
    EndingDate(Option<NaiveDate>),
    Position(String),
    Hospital(String),
}

impl ItemField<Experience> for ExperienceField {
    fn apply(self, item: &mut Experience) {
        match self {
            ExperienceField::StartingDate(v) => item.starting_date = v,
            ExperienceField::EndingDate(v) => item.ending_date = v,
            ExperienceField::Position(v) => item.position = v,
            ExperienceField::Hospital(v) => item.hospital = v,
        }
    }

    fn parse(field: &str, value: &str) -> Result<Self, EditError> {
        Ok(match field {
            "startingDate" => ExperienceField::StartingDate(blank_or_date(field, value)?),
            "endingDate" => ExperienceField::EndingDate(blank_or_date(field, value)?),
            "position" => ExperienceField::Position(value.to_string()),
            "hospital" => ExperienceField::Hospital(value.to_string()),
            _ => return Err(unknown("experiences", field)),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeSlotField {
    Day(Weekday),
    StartingTime(Option<NaiveTime>),
    EndingTime(Option<NaiveTime>),
}

impl ItemField<TimeSlot> for TimeSlotField {
    fn apply(self, item: &mut TimeSlot) {
        match self {
            TimeSlotField::Day(v) => item.day = v,
            TimeSlotField::StartingTime(v) => item.starting_time = v,
            TimeSlotField::EndingTime(v) => item.ending_time = v,
        }
    }

    fn parse(field: &str, value: &str) -> Result<Self, EditError> {
        Ok(match field {
            "day" => TimeSlotField::Day(
                parse_variant(value).map_err(|e| EditError::invalid(field, value, e))?,
            ),
            "startingTime" => TimeSlotField::StartingTime(blank_or_time(field, value)?),
            "endingTime" => TimeSlotField::EndingTime(blank_or_time(field, value)?),
            _ => return Err(unknown("timeSlots", field)),
        })
    }
}

/// Edits to the scalar part of the draft.
///
/// `email` has no variant: it is fixed for the editing session. `photo` only
/// changes through an avatar upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    Name(String),
    Phone(String),
    Bio(String),
    Gender(Gender),
    Specialization(Specialization),
    TicketPrice(TicketPrice),
    About(String),
}

/// Consultation fee. Always finite and non-negative, whichever path built it.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TicketPrice(f64);

impl TicketPrice {
    pub const ZERO: TicketPrice = TicketPrice(0.0);

    pub fn new(price: f64) -> Result<Self, EditError> {
        if !price.is_finite() || price < 0.0 {
            return Err(EditError::invalid(
                "ticketPrice",
                &price.to_string(),
                "must be a non-negative number",
            ));
        }
        Ok(TicketPrice(price))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for TicketPrice {
    type Error = EditError;

    fn try_from(price: f64) -> Result<Self, Self::Error> {
        TicketPrice::new(price)
    }
}

impl ProfileEdit {
    pub(crate) fn apply(self, record: &mut DraftRecord) {
        match self {
            ProfileEdit::Name(v) => record.name = v,
            ProfileEdit::Phone(v) => record.phone = v,
            ProfileEdit::Bio(v) => record.bio = v,
            ProfileEdit::Gender(v) => record.gender = v,
            ProfileEdit::Specialization(v) => record.specialization = v,
            ProfileEdit::TicketPrice(v) => record.ticket_price = v,
            ProfileEdit::About(v) => record.about = v,
        }
    }

    pub fn parse(field: &str, value: &str) -> Result<Self, EditError> {
        Ok(match field {
            "name" => ProfileEdit::Name(value.to_string()),
            "phone" => ProfileEdit::Phone(value.to_string()),
            "bio" => ProfileEdit::Bio(value.to_string()),
            "about" => ProfileEdit::About(value.to_string()),
            "gender" => ProfileEdit::Gender(
                parse_variant(value).map_err(|e| EditError::invalid(field, value, e))?,
            ),
            "specialization" => ProfileEdit::Specialization(
                parse_variant(value).map_err(|e| EditError::invalid(field, value, e))?,
            ),
            "ticketPrice" => ProfileEdit::TicketPrice(parse_price(field, value)?),
            "email" | "photo" => return Err(EditError::ReadOnlyField(field.to_string())),
            _ => return Err(unknown("profile", field)),
        })
    }
}

fn unknown(collection: &str, field: &str) -> EditError {
    EditError::UnknownField {
        collection: collection.to_string(),
        field: field.to_string(),
    }
}

fn blank_or_date(field: &str, value: &str) -> Result<Option<NaiveDate>, EditError> {
    match value.trim() {
        "" => Ok(None),
        text => parse_date(text)
            .map(Some)
            .map_err(|e| EditError::invalid(field, value, e)),
    }
}

fn blank_or_time(field: &str, value: &str) -> Result<Option<NaiveTime>, EditError> {
    match value.trim() {
        "" => Ok(None),
        text => parse_time(text)
            .map(Some)
            .map_err(|e| EditError::invalid(field, value, e)),
    }
}

// An emptied number input reads as zero, like a blank draft.
fn parse_price(field: &str, value: &str) -> Result<TicketPrice, EditError> {
    let text = value.trim();
    if text.is_empty() {
        return Ok(TicketPrice::ZERO);
    }
    let price = text
        .parse::<f64>()
        .map_err(|e| EditError::invalid(field, value, e))?;
    TicketPrice::new(price).map_err(|e| match e {
        EditError::InvalidValue { reason, .. } => EditError::invalid(field, value, reason),
        other => other,
    })
}

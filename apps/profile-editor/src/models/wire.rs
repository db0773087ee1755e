//! Serde helpers for the form-shaped wire format.
//!
//! The remote store and the editing form both use `""` for "nothing selected",
//! so unset dates, times and selections travel as empty strings rather than
//! `null`.
//!
//! Inbound readers are lenient per field: a stored value the editor cannot
//! read is logged and comes through blank, and the rest of the record still
//! loads.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a form value as a `YYYY-MM-DD` date.
/// Stored records may carry a full RFC 3339 timestamp instead; only its date is kept.
pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).or_else(|err| {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.date_naive())
            .map_err(|_| err)
    })
}

/// Parses a form value as `HH:MM`, tolerating a seconds suffix.
pub fn parse_time(text: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|err| NaiveTime::parse_from_str(text, "%H:%M:%S").map_err(|_| err))
}

/// Parses a wire string into a unit-variant enum using its serde names.
pub fn parse_variant<T: DeserializeOwned>(raw: &str) -> Result<T, ValueError> {
    let de: StrDeserializer<'_, ValueError> = raw.trim().into_deserializer();
    T::deserialize(de)
}

/// Reads an optional scalar as text. Non-text values are logged and read as absent.
fn scalar_text<'de, D: Deserializer<'de>>(d: D, what: &str) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            warn!("ignoring stored {what} {other}: not a string");
            None
        }
    })
}

pub mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.collect_str(&date.format(super::DATE_FORMAT)),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let text = super::scalar_text(d, "date")?;
        Ok(match text.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => match super::parse_date(text) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!("ignoring stored date {text:?}: {e}");
                    None
                }
            },
        })
    }
}

pub mod blank_time {
    use chrono::NaiveTime;
    use serde::{Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.collect_str(&time.format(super::TIME_FORMAT)),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let text = super::scalar_text(d, "time")?;
        Ok(match text.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => match super::parse_time(text) {
                Ok(time) => Some(time),
                Err(e) => {
                    warn!("ignoring stored time {text:?}: {e}");
                    None
                }
            },
        })
    }
}

/// Reads a stored selection by its wire name. An unknown name is logged and
/// read as absent.
pub fn lenient_choice<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(text) = scalar_text(d, "selection")? else {
        return Ok(None);
    };
    match parse_variant(&text) {
        Ok(choice) => Ok(Some(choice)),
        Err(e) => {
            warn!("ignoring stored selection {text:?}: {e}");
            Ok(None)
        }
    }
}

/// Like [`lenient_choice`], falling back to the blank selection.
pub fn lenient_variant<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient_choice(d).map(Option::unwrap_or_default)
}

/// Accepts a string, a number or null. Phone numbers are stored as numbers by
/// some backends and as strings by others.
pub fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(d)? {
        None => None,
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
    })
}

/// Accepts a number, a numeric string, an empty string or null. Anything else
/// is logged and read as absent.
pub fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("ignoring stored number {text:?}: {e}");
                None
            }
        },
        Some(other) => {
            warn!("ignoring stored number {other}: not a number");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_plain() {
        assert_eq!(
            parse_date("2019-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2019, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_from_timestamp() {
        assert_eq!(
            parse_date("2015-06-01T00:00:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_time_with_and_without_seconds() {
        let expected = NaiveTime::from_hms_opt(4, 30, 0).unwrap();
        assert_eq!(parse_time("04:30").unwrap(), expected);
        assert_eq!(parse_time("04:30:00").unwrap(), expected);
        assert!(parse_time("25:00").is_err());
    }
}

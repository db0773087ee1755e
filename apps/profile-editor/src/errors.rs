use thiserror::Error;

/// Rejections raised by the string-keyed and token-keyed edit paths.
///
/// The positional typed API never returns these: an out-of-range index there
/// is a caller bug and panics instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("Unknown field '{field}' for {collection}")]
    UnknownField { collection: String, field: String },

    #[error("Field '{0}' cannot be edited")]
    ReadOnlyField(String),

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Index {index} out of range for {collection} (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    #[error("No entry with token {token} in {collection}")]
    UnknownEntry { collection: String, token: u64 },
}

impl EditError {
    pub(crate) fn invalid(field: &str, value: &str, reason: impl ToString) -> Self {
        EditError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

use thiserror::Error;

/// One failed check.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },

    #[error("{field}: '{value}' is not a binary string")]
    NotBinary { field: String, value: String },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl Violation {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Invalid { field, .. }
            | Self::NotBinary { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

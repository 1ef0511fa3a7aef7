#![forbid(unsafe_code)]

use std::fmt;

use crate::RecordId;

/// A field formatter failed for a specific record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub field: String,
    pub record: RecordId,
    pub message: String,
}

impl FormatError {
    #[must_use]
    pub fn new(field: impl Into<String>, record: RecordId, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            record,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "formatter for field '{}' failed on record '{}': {}",
            self.field, self.record, self.message
        )
    }
}

impl std::error::Error for FormatError {}

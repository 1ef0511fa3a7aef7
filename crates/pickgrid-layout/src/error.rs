#![forbid(unsafe_code)]

use std::fmt;

use pickgrid_core::FormatError;

/// Errors raised while allocating a width template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A field formatter failed while measuring natural widths.
    Format(FormatError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(err) => write!(f, "layout aborted: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
        }
    }
}

impl From<FormatError> for LayoutError {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

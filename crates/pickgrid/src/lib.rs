#![forbid(unsafe_code)]

//! Pickgrid public facade crate.
//!
//! Re-exports the record model, the measurement and layout engines, the
//! search engine and (with the default `runtime` feature) the picker
//! runtime, plus a prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pickgrid_core::{
    Field, FormatError, Formatted, OverflowPolicy, Record, RecordId, RecordRef, RichText,
    SortDirection, Value, compare_records,
};

// --- Text re-exports -------------------------------------------------------

pub use pickgrid_text::{CacheStats, FontSpec, FormatCache, MonospaceMeasurer, TextMeasurer, WidthCache};

// --- Layout re-exports -----------------------------------------------------

pub use pickgrid_layout::{Container, LayoutConfig, LayoutEngine, LayoutError, WidthTemplate};

// --- Search re-exports -----------------------------------------------------

pub use pickgrid_search::{
    Keyword, KeywordIndex, KeywordKind, MatchMode, RankWeights, SearchField, SearchProfile,
    Searchable, Searcher, parse_query, search,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use pickgrid_runtime::{
    Chrome, Effect, Engine, Frame, PickOption, Picker, PickerConfig, Update, WidgetProps,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for pickgrid hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field formatter failed.
    Format(FormatError),
    /// Width allocation failed.
    Layout(LayoutError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
            Self::Layout(err) => Some(err),
        }
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

/// Standard result type for pickgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Container, Error, Field, FontSpec, LayoutEngine, Record, RecordRef, Result, SearchProfile,
        SortDirection, Value, WidthTemplate,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Effect, Engine, Frame, Picker, PickerConfig, Update, WidgetProps};

    pub use crate::{core, layout, search, text};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use pickgrid_core as core;
pub use pickgrid_layout as layout;
#[cfg(feature = "runtime")]
pub use pickgrid_runtime as runtime;
pub use pickgrid_search as search;
pub use pickgrid_text as text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_errors_convert_and_chain() {
        let format = FormatError {
            field: "ticker".into(),
            record: "1".into(),
            message: "bad".into(),
        };
        let err: Error = LayoutError::Format(format.clone()).into();
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(Error::from(format.clone()), Error::Format(format));
    }
}

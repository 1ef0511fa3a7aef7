#![forbid(unsafe_code)]

//! Core data model for pickgrid.
//!
//! This crate holds the types every engine agrees on:
//! - [`Value`] - a scalar record value (text, number, boolean)
//! - [`Record`] / [`RecordId`] - an immutable, id-keyed row
//! - [`Field`] - a column descriptor with formatter, existence predicate,
//!   overflow policy and sort comparator
//! - [`Formatted`] / [`RichText`] - formatter output, plain or composite
//! - [`FormatError`] - the one error a formatter can raise
//!
//! # Example
//! ```
//! use pickgrid_core::{Field, Record, Value, ensure_unique};
//! use std::sync::Arc;
//!
//! let records = vec![
//!     Arc::new(Record::new("A").with("name", "Alpha")),
//!     Arc::new(Record::new("B").with("name", "Beta")),
//!     Arc::new(Record::new("A").with("name", "Alpha (dup)")),
//! ];
//! let unique = ensure_unique(&records);
//! assert_eq!(unique.len(), 2);
//!
//! let name = Field::new("name", "Name").truncatable();
//! assert_eq!(name.format(&unique[0]).unwrap().text(), "Alpha");
//! assert_eq!(unique[1].get("name"), Some(&Value::from("Beta")));
//! ```

pub mod compare;
pub mod error;
pub mod field;
pub mod record;
pub mod rich;
pub mod value;

pub use compare::{
    CompareFn, SortDirection, compare_default, compare_iso_dates, compare_records,
    compare_text_ci, parse_date_parts, preferred_first, ranked_scale,
};
pub use error::FormatError;
pub use field::{ExistsFn, Field, FormatFn, OverflowPolicy};
pub use record::{Record, RecordId, RecordRef, ensure_unique, same_id_set};
pub use rich::{Formatted, RichText};
pub use value::Value;

#![forbid(unsafe_code)]

//! Column descriptors.
//!
//! A [`Field`] tells the engines how to turn one attribute of a record into
//! display text, whether a record "has" that attribute, how the column may
//! give up space when the row overflows, and how to sort by it.
//!
//! Field order is column order. Nothing in pickgrid reorders fields.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::compare::{CompareFn, compare_default};
use crate::{FormatError, Formatted, Record, Value};

/// Formatter callback: `(raw value, record) -> display`.
pub type FormatFn = Arc<dyn Fn(Option<&Value>, &Record) -> Result<Formatted, String> + Send + Sync>;

/// Existence predicate: `(raw value, record) -> has data`.
pub type ExistsFn = Arc<dyn Fn(Option<&Value>, &Record) -> bool + Send + Sync>;

bitflags! {
    /// How a column may yield width when the row overflows its budget.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OverflowPolicy: u8 {
        /// The column may be hidden entirely.
        const HIDE = 0b01;
        /// The column may be narrowed.
        const TRUNCATE = 0b10;
    }
}

/// A renderable, searchable, sortable attribute.
#[derive(Clone)]
pub struct Field {
    id: String,
    header: String,
    formatter: Option<FormatFn>,
    exists: Option<ExistsFn>,
    overflow: OverflowPolicy,
    comparator: Option<CompareFn>,
}

impl Field {
    /// Create a field reading the record value named `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            formatter: None,
            exists: None,
            overflow: OverflowPolicy::empty(),
            comparator: None,
        }
    }

    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Option<&Value>, &Record) -> Result<Formatted, String> + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn with_exists<F>(mut self, exists: F) -> Self
    where
        F: Fn(Option<&Value>, &Record) -> bool + Send + Sync + 'static,
    {
        self.exists = Some(Arc::new(exists));
        self
    }

    #[must_use]
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(Option<&Value>, Option<&Value>) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Mark the column hideable on overflow.
    #[must_use]
    pub fn hideable(mut self) -> Self {
        self.overflow |= OverflowPolicy::HIDE;
        self
    }

    /// Mark the column truncatable on overflow.
    #[must_use]
    pub fn truncatable(mut self) -> Self {
        self.overflow |= OverflowPolicy::TRUNCATE;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    #[must_use]
    pub fn is_hideable(&self) -> bool {
        self.overflow.contains(OverflowPolicy::HIDE)
    }

    #[must_use]
    pub fn is_truncatable(&self) -> bool {
        self.overflow.contains(OverflowPolicy::TRUNCATE)
    }

    #[must_use]
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// The raw value this field reads from `record`.
    #[must_use]
    pub fn raw<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        record.get(&self.id)
    }

    /// Whether `record` has data for this field.
    ///
    /// Without an existence predicate a record has data iff it carries the
    /// property at all.
    #[must_use]
    pub fn has_data(&self, record: &Record) -> bool {
        let value = self.raw(record);
        match &self.exists {
            Some(exists) => exists(value, record),
            None => value.is_some(),
        }
    }

    /// Run the formatter (or the raw display fallback) for `record`.
    ///
    /// A missing value with no formatter formats to the empty string.
    pub fn format(&self, record: &Record) -> Result<Formatted, FormatError> {
        let value = self.raw(record);
        match &self.formatter {
            Some(formatter) => formatter(value, record)
                .map_err(|message| FormatError::new(self.id.clone(), record.id().clone(), message)),
            None => Ok(Formatted::Plain(value.map(Value::to_string).unwrap_or_default())),
        }
    }

    /// Compare two records by this field's values.
    #[must_use]
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let (left, right) = (self.raw(a), self.raw(b));
        match &self.comparator {
            Some(cmp) => cmp(left, right),
            None => compare_default(left, right),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("formatter", &self.formatter.is_some())
            .field("exists", &self.exists.is_some())
            .field("overflow", &self.overflow)
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}

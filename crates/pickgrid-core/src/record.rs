#![forbid(unsafe_code)]

//! Records and record identity.
//!
//! A [`Record`] is an immutable mapping from field name to [`Value`],
//! identified by a [`RecordId`]. Two records are equal when their ids are
//! equal, regardless of their values; every list-level comparison in the
//! engines (dedup, id-set equality, selection lookup) relies on that.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::Value;

/// Shared handle to an immutable record.
pub type RecordRef = Arc<Record>;

/// Unique record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Arc<str>);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

/// One selectable row.
#[derive(Debug, Clone)]
pub struct Record {
    id: RecordId,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record with the given id.
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Look up a value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the record carries a value under `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// De-duplicate a record list by id, keeping the first occurrence of each id
/// and preserving first-seen order.
#[must_use]
pub fn ensure_unique(records: &[RecordRef]) -> Vec<RecordRef> {
    let mut seen: FxHashSet<&RecordId> = FxHashSet::default();
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.id()) {
            out.push(Arc::clone(record));
        }
    }
    out
}

/// Whether two record lists contain exactly the same set of ids.
///
/// Order and duplicates are ignored.
#[must_use]
pub fn same_id_set(a: &[RecordRef], b: &[RecordRef]) -> bool {
    let left: FxHashSet<&RecordId> = a.iter().map(|r| r.id()).collect();
    let right: FxHashSet<&RecordId> = b.iter().map(|r| r.id()).collect();
    left == right
}

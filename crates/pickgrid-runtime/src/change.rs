#![forbid(unsafe_code)]

//! Change-set vocabulary: what changed, to what, and how it is scheduled.

use std::fmt;
use std::sync::Arc;

use pickgrid_core::{RecordId, RecordRef, SortDirection, ensure_unique, same_id_set};
use pickgrid_layout::WidthTemplate;
use rustc_hash::FxHashMap;

/// Every property the picker tracks, across props and internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeKind {
    // Props
    Records,
    DisabledRecords,
    Selection,
    Width,
    TextTemplate,
    OptionsTemplate,
    Disabled,
    Loading,
    NoResultsMessage,
    DefaultSort,
    DefaultSortDirection,
    // State
    Options,
    OpenedAt,
    Query,
    SortField,
    SortDirection,
}

impl ChangeKind {
    pub const PROPS: [Self; 11] = [
        Self::Records,
        Self::DisabledRecords,
        Self::Selection,
        Self::Width,
        Self::TextTemplate,
        Self::OptionsTemplate,
        Self::Disabled,
        Self::Loading,
        Self::NoResultsMessage,
        Self::DefaultSort,
        Self::DefaultSortDirection,
    ];

    pub const STATE: [Self; 5] = [
        Self::Options,
        Self::OpenedAt,
        Self::Query,
        Self::SortField,
        Self::SortDirection,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::DisabledRecords => "disabled_records",
            Self::Selection => "selection",
            Self::Width => "width",
            Self::TextTemplate => "text_template",
            Self::OptionsTemplate => "options_template",
            Self::Disabled => "disabled",
            Self::Loading => "loading",
            Self::NoResultsMessage => "no_results_message",
            Self::DefaultSort => "default_sort",
            Self::DefaultSortDirection => "default_sort_direction",
            Self::Options => "options",
            Self::OpenedAt => "opened_at",
            Self::Query => "query",
            Self::SortField => "sort_field",
            Self::SortDirection => "sort_direction",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of one tracked property.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeValue {
    Records(Arc<[RecordRef]>),
    Record(Option<RecordRef>),
    Width(f64),
    Template(Option<Arc<WidthTemplate>>),
    Flag(bool),
    Text(Option<String>),
    Direction(SortDirection),
    Generation(u64),
    Timestamp(u64),
}

impl ChangeValue {
    #[must_use]
    pub fn as_records(&self) -> Option<&[RecordRef]> {
        match self {
            Self::Records(records) => Some(records),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Self::Record(record) => record.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => text.as_deref(),
            _ => None,
        }
    }
}

/// When an accepted change is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// This tick.
    Immediate,
    /// On the next idle frame.
    Deferred,
}

/// Returns `true` when the two values differ for scheduling purposes.
pub type DeltaFn = fn(Option<&ChangeValue>, Option<&ChangeValue>) -> bool;

/// Canonicalizes a value before comparison.
pub type NormalizeFn = fn(ChangeValue) -> ChangeValue;

/// Per-property scheduling rules.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub timing: Timing,
    /// Application order; `None` sorts after every ordered entry.
    pub order: Option<i32>,
    pub is_delta: DeltaFn,
    pub normalize: Option<NormalizeFn>,
    /// Only affects surrounding chrome; options are not recomputed.
    pub chrome_only: bool,
    /// Runs a transform when applied.
    pub apply_directly: bool,
}

impl Policy {
    #[must_use]
    pub const fn immediate(order: i32) -> Self {
        Self {
            timing: Timing::Immediate,
            order: Some(order),
            is_delta: values_differ,
            normalize: None,
            chrome_only: false,
            apply_directly: true,
        }
    }

    #[must_use]
    pub const fn deferred(order: i32) -> Self {
        Self {
            timing: Timing::Deferred,
            ..Self::immediate(order)
        }
    }

    #[must_use]
    pub const fn unordered(mut self) -> Self {
        self.order = None;
        self
    }

    #[must_use]
    pub const fn with_delta(mut self, is_delta: DeltaFn) -> Self {
        self.is_delta = is_delta;
        self
    }

    #[must_use]
    pub const fn with_normalize(mut self, normalize: NormalizeFn) -> Self {
        self.normalize = Some(normalize);
        self
    }

    #[must_use]
    pub const fn chrome_only(mut self) -> Self {
        self.chrome_only = true;
        self
    }

    #[must_use]
    pub const fn not_applied_directly(mut self) -> Self {
        self.apply_directly = false;
        self
    }

    /// Sort key: ordered entries first, ascending.
    #[must_use]
    pub fn sort_key(&self) -> (bool, i32) {
        (self.order.is_none(), self.order.unwrap_or(0))
    }
}

/// Plain inequality.
#[must_use]
pub fn values_differ(new: Option<&ChangeValue>, old: Option<&ChangeValue>) -> bool {
    new != old
}

/// Record lists differ only when their id sets differ.
#[must_use]
pub fn record_sets_differ(new: Option<&ChangeValue>, old: Option<&ChangeValue>) -> bool {
    match (new.and_then(ChangeValue::as_records), old.and_then(ChangeValue::as_records)) {
        (Some(a), Some(b)) => !same_id_set(a, b),
        (None, None) => false,
        _ => true,
    }
}

/// Selections differ only when the selected ids differ.
#[must_use]
pub fn selection_differs(new: Option<&ChangeValue>, old: Option<&ChangeValue>) -> bool {
    let id = |v: Option<&ChangeValue>| -> Option<RecordId> {
        v.and_then(ChangeValue::as_record).map(|r| r.id().clone())
    };
    id(new) != id(old)
}

/// Drops repeated record ids, first occurrence wins.
#[must_use]
pub fn dedup_records(value: ChangeValue) -> ChangeValue {
    match value {
        ChangeValue::Records(records) => ChangeValue::Records(ensure_unique(&records).into()),
        other => other,
    }
}

/// Policies by property.
#[derive(Debug, Clone, Default)]
pub struct PolicyMap {
    policies: FxHashMap<ChangeKind, Policy>,
}

impl PolicyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: ChangeKind, policy: Policy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    #[must_use]
    pub fn get(&self, kind: ChangeKind) -> Option<&Policy> {
        self.policies.get(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// One detected difference between two snapshots.
#[derive(Debug, Clone)]
pub struct ChangeEntry {
    pub name: ChangeKind,
    pub new_value: Option<ChangeValue>,
    pub old_value: Option<ChangeValue>,
    pub policy: Policy,
}

impl ChangeEntry {
    /// Same property and, by this entry's own policy, the same new value.
    #[must_use]
    pub fn same_change(&self, other: &ChangeEntry) -> bool {
        self.name == other.name && !(self.policy.is_delta)(self.new_value.as_ref(), other.new_value.as_ref())
    }

    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.policy.timing == Timing::Immediate
    }
}

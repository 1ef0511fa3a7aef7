#![forbid(unsafe_code)]

//! Change-set computation between two snapshots.
//!
//! # Invariants
//!
//! - Every property is visited once: those present in the new snapshot
//!   first, then those only present in the old one.
//! - Properties without a policy are ignored.
//! - Both values are normalized before the policy's delta test.
//! - Output is stable-sorted by policy order; unordered entries come last,
//!   latest-encountered first.

use rustc_hash::FxHashSet;

use crate::change::{ChangeEntry, ChangeKind, ChangeValue, PolicyMap};

/// A keyed view of props or state.
pub trait Snapshot {
    /// Properties currently present.
    fn keys(&self) -> Vec<ChangeKind>;

    /// Value of a present property.
    fn value(&self, kind: ChangeKind) -> Option<ChangeValue>;
}

/// Entries for every property that differs between `new` and `old`.
///
/// With no `old` snapshot every present property counts as changed.
pub fn diff<S: Snapshot + ?Sized>(new: &S, old: Option<&S>, policies: &PolicyMap) -> Vec<ChangeEntry> {
    let mut seen = FxHashSet::default();
    let old_keys = old.map(|o| o.keys()).unwrap_or_default();
    let mut entries = Vec::new();

    for kind in new.keys().into_iter().chain(old_keys) {
        if !seen.insert(kind) {
            continue;
        }
        let Some(policy) = policies.get(kind).copied() else {
            continue;
        };
        let normalize = |value: ChangeValue| match policy.normalize {
            Some(f) => f(value),
            None => value,
        };
        let new_value = new.value(kind).map(normalize);
        let old_value = old.and_then(|o| o.value(kind)).map(normalize);
        if (policy.is_delta)(new_value.as_ref(), old_value.as_ref()) {
            entries.push(ChangeEntry {
                name: kind,
                new_value,
                old_value,
                policy,
            });
        }
    }

    entries.reverse();
    entries.sort_by_key(|e| e.policy.sort_key());
    entries
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pickgrid_core::{Record, RecordRef, SortDirection};

    use super::*;
    use crate::props::{WidgetProps, WidgetState, props_policies, state_policies};

    fn recs(ids: &[&str]) -> Vec<RecordRef> {
        ids.iter().map(|id| Arc::new(Record::new(*id))).collect()
    }

    fn names(entries: &[ChangeEntry]) -> Vec<ChangeKind> {
        entries.iter().map(|e| e.name).collect()
    }

    #[test]
    fn identical_snapshots_produce_nothing() {
        let props = WidgetProps::new(recs(&["a", "b"])).with_width(300.0);
        assert!(diff(&props, Some(&props.clone()), &props_policies()).is_empty());
    }

    #[test]
    fn mount_reports_every_set_property() {
        let props = WidgetProps::new(recs(&["a"])).with_width(300.0);
        let entries = diff(&props, None, &props_policies());
        assert_eq!(
            names(&entries),
            [
                ChangeKind::Records,
                ChangeKind::DisabledRecords,
                ChangeKind::Width,
                ChangeKind::OptionsTemplate,
                ChangeKind::TextTemplate,
                ChangeKind::Disabled,
                ChangeKind::Loading,
                ChangeKind::NoResultsMessage,
                ChangeKind::DefaultSort,
                ChangeKind::DefaultSortDirection,
            ]
        );
    }

    #[test]
    fn entries_sorted_by_order() {
        let old = WidgetProps::new(recs(&["a"]));
        let new = old
            .clone()
            .with_loading(true)
            .with_records(recs(&["a", "b"]))
            .with_selection(Some(Arc::new(Record::new("a"))));
        let entries = diff(&new, Some(&old), &props_policies());
        assert_eq!(
            names(&entries),
            [ChangeKind::Records, ChangeKind::Selection, ChangeKind::Loading]
        );
        assert!(!entries[0].is_immediate());
        assert!(entries[2].policy.chrome_only);
    }

    #[test]
    fn reordered_or_duplicated_records_are_not_a_change() {
        let old = WidgetProps::new(recs(&["a", "b"]));
        let new = WidgetProps::new(recs(&["b", "a", "b"]));
        assert!(diff(&new, Some(&old), &props_policies()).is_empty());
    }

    #[test]
    fn removed_width_is_a_change() {
        let old = WidgetProps::new(recs(&["a"])).with_width(300.0);
        let new = WidgetProps::new(recs(&["a"]));
        let entries = diff(&new, Some(&old), &props_policies());
        assert_eq!(names(&entries), [ChangeKind::Width]);
        assert!(entries[0].new_value.is_none());
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let old = WidgetProps::new(recs(&["a"]));
        let new = old.clone().with_loading(true);
        assert!(diff(&new, Some(&old), &PolicyMap::new()).is_empty());
    }

    #[test]
    fn state_changes() {
        let old = WidgetState::default();
        let new = WidgetState {
            query: "ap".into(),
            sort_field: Some("coupon".into()),
            sort_direction: SortDirection::Descending,
            ..old.clone()
        };
        let entries = diff(&new, Some(&old), &state_policies());
        assert_eq!(
            names(&entries),
            [ChangeKind::Query, ChangeKind::SortField, ChangeKind::SortDirection]
        );
    }
}

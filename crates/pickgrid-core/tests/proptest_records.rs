//! Property tests for record identity helpers.
//!
//! 1. `ensure_unique` output has no duplicate ids.
//! 2. `ensure_unique` keeps the first occurrence of every id, in order.
//! 3. `ensure_unique` is idempotent.
//! 4. `same_id_set` is reflexive and ignores duplication.

use std::sync::Arc;

use pickgrid_core::{Record, RecordRef, ensure_unique, same_id_set};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn records_strategy() -> impl Strategy<Value = Vec<RecordRef>> {
    prop::collection::vec((0u8..12, 0u32..1000), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(id, tag)| Arc::new(Record::new(format!("R{id}")).with("tag", f64::from(tag))))
            .collect()
    })
}

proptest! {
    #[test]
    fn ensure_unique_has_no_duplicate_ids(records in records_strategy()) {
        let unique = ensure_unique(&records);
        let mut ids: Vec<_> = unique.iter().map(|r| r.id().clone()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(before, ids.len());
    }

    #[test]
    fn ensure_unique_keeps_first_occurrence(records in records_strategy()) {
        let unique = ensure_unique(&records);
        let mut expected: Vec<RecordRef> = Vec::new();
        for r in &records {
            if !expected.iter().any(|e| e.id() == r.id()) {
                expected.push(Arc::clone(r));
            }
        }
        prop_assert_eq!(unique.len(), expected.len());
        for (got, want) in unique.iter().zip(expected.iter()) {
            prop_assert!(Arc::ptr_eq(got, want));
        }
    }

    #[test]
    fn ensure_unique_is_idempotent(records in records_strategy()) {
        let once = ensure_unique(&records);
        let twice = ensure_unique(&once);
        prop_assert_eq!(once.len(), twice.len());
        prop_assert!(once.iter().zip(twice.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn same_id_set_survives_dedup(records in records_strategy()) {
        prop_assert!(same_id_set(&records, &records));
        prop_assert!(same_id_set(&records, &ensure_unique(&records)));
    }
}

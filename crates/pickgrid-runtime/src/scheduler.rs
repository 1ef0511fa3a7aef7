#![forbid(unsafe_code)]

//! Update scheduler: decides when queued changes are applied.
//!
//! The scheduler owns the queue of accepted-but-unapplied change entries,
//! the most recently applied entry per property, and the single deferred
//! batch waiting for an idle frame. It never touches options; the picker
//! runs transforms over whatever the scheduler hands back.
//!
//! # State Machine
//!
//! ```text
//! Mounting ──mount──▶ Idle ──immediate work──▶ ApplyingImmediate ──▶ Idle
//!                       │                                      (defer batch,
//!                       │                                  request idle frame)
//!                       └──idle frame──▶ ApplyingDeferred ──▶ Idle
//! ```
//!
//! # Invariants
//!
//! - **Idempotent enqueue**: an entry equal, by its own policy, to the
//!   applied entry or a queued entry of the same property is dropped.
//! - **Latest wins**: a queued entry is replaced by a newer, different
//!   entry for the same property, and withdrawn when the property reverts
//!   to its applied value.
//! - **Ordered**: the queue is always stable-sorted by policy order.
//! - **One batch**: at most one idle frame is outstanding; later work
//!   joins the same batch.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::change::{ChangeEntry, ChangeKind};

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Mounting,
    Idle,
    ApplyingImmediate,
    ApplyingDeferred,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    pub enqueued: u64,
    pub dropped: u64,
    pub replaced: u64,
    pub immediate_batches: u64,
    pub deferred_batches: u64,
}

/// Queue reducer for one picker.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    phase: Phase,
    pending: Vec<ChangeEntry>,
    applied: FxHashMap<ChangeKind, ChangeEntry>,
    batch: Vec<ChangeEntry>,
    idle_requested: bool,
    stats: SchedulerStats,
}

impl UpdateScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn pending(&self) -> &[ChangeEntry] {
        &self.pending
    }

    #[must_use]
    pub fn batch(&self) -> &[ChangeEntry] {
        &self.batch
    }

    #[must_use]
    pub fn applied(&self, kind: ChangeKind) -> Option<&ChangeEntry> {
        self.applied.get(&kind)
    }

    #[must_use]
    pub fn idle_requested(&self) -> bool {
        self.idle_requested
    }

    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Record the initial entries as applied and go idle.
    pub fn mount(&mut self, entries: &[ChangeEntry]) {
        self.mark_applied(entries);
        self.transition(Phase::Idle);
    }

    /// Record entries that were applied outside the queue.
    pub fn mark_applied(&mut self, entries: &[ChangeEntry]) {
        for entry in entries {
            self.applied.insert(entry.name, entry.clone());
        }
    }

    /// Merge `entries` into the queue. Returns whether immediate work is
    /// queued.
    pub fn enqueue(&mut self, entries: Vec<ChangeEntry>) -> bool {
        for entry in entries {
            if self.applied.get(&entry.name).is_some_and(|a| entry.same_change(a)) {
                // Reverted to the applied value: a queued change is now stale.
                let before = self.pending.len();
                self.pending.retain(|p| p.name != entry.name);
                if self.pending.len() < before {
                    self.stats.replaced += 1;
                } else {
                    self.stats.dropped += 1;
                }
                continue;
            }
            match self.pending.iter().position(|p| p.name == entry.name) {
                Some(pos) if entry.same_change(&self.pending[pos]) => {
                    self.stats.dropped += 1;
                }
                Some(pos) => {
                    self.pending[pos] = entry;
                    self.stats.replaced += 1;
                }
                None => {
                    self.pending.push(entry);
                    self.stats.enqueued += 1;
                }
            }
        }
        self.pending.sort_by_key(|e| e.policy.sort_key());
        debug!(pending = self.pending.len(), "changes enqueued");
        self.has_immediate()
    }

    #[must_use]
    pub fn has_immediate(&self) -> bool {
        self.pending.iter().any(ChangeEntry::is_immediate)
    }

    /// Take the immediate entries off the queue for this tick.
    pub fn begin_immediate(&mut self) -> Vec<ChangeEntry> {
        let (to_process, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(ChangeEntry::is_immediate);
        self.pending = rest;
        self.mark_applied(&to_process);
        self.stats.immediate_batches += 1;
        self.transition(Phase::ApplyingImmediate);
        to_process
    }

    /// Park processed entries for the next idle frame. Returns `true` when
    /// the host must be asked for one.
    pub fn defer(&mut self, processed: Vec<ChangeEntry>) -> bool {
        merge_by_name(&mut self.batch, processed);
        self.request_idle()
    }

    /// Ask for an idle frame for deferred-only work, if none is outstanding.
    pub fn request_deferred(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.request_idle()
    }

    fn request_idle(&mut self) -> bool {
        if self.idle_requested {
            return false;
        }
        self.idle_requested = true;
        debug!(batch = self.batch.len(), pending = self.pending.len(), "idle frame requested");
        true
    }

    /// Idle frame: the batch plus every queued entry, deferred included.
    pub fn begin_deferred(&mut self) -> Vec<ChangeEntry> {
        self.idle_requested = false;
        self.stats.deferred_batches += 1;
        self.transition(Phase::ApplyingDeferred);
        self.drain_all()
    }

    /// Everything outstanding, so an opening list reflects every accepted
    /// change.
    pub fn flush_for_open(&mut self) -> Vec<ChangeEntry> {
        self.transition(Phase::ApplyingImmediate);
        self.drain_all()
    }

    fn drain_all(&mut self) -> Vec<ChangeEntry> {
        let mut entries = std::mem::take(&mut self.batch);
        let pending = std::mem::take(&mut self.pending);
        self.mark_applied(&pending);
        merge_by_name(&mut entries, pending);
        entries
    }

    /// Back to idle after applying.
    pub fn finish(&mut self) {
        self.transition(Phase::Idle);
    }

    fn transition(&mut self, to: Phase) {
        if self.phase != to {
            debug!(from = ?self.phase, to = ?to, "scheduler phase");
            self.phase = to;
        }
    }
}

/// Later entries replace earlier ones of the same property; result is
/// stable-sorted by order.
fn merge_by_name(into: &mut Vec<ChangeEntry>, entries: Vec<ChangeEntry>) {
    for entry in entries {
        match into.iter().position(|e| e.name == entry.name) {
            Some(pos) => into[pos] = entry,
            None => into.push(entry),
        }
    }
    into.sort_by_key(|e| e.policy.sort_key());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ChangeValue, Policy};

    fn flag(name: ChangeKind, value: bool, policy: Policy) -> ChangeEntry {
        ChangeEntry {
            name,
            new_value: Some(ChangeValue::Flag(value)),
            old_value: None,
            policy,
        }
    }

    fn names(entries: &[ChangeEntry]) -> Vec<ChangeKind> {
        entries.iter().map(|e| e.name).collect()
    }

    fn mounted() -> UpdateScheduler {
        let mut s = UpdateScheduler::new();
        assert_eq!(s.phase(), Phase::Mounting);
        s.mount(&[flag(ChangeKind::Loading, false, Policy::immediate(7))]);
        assert_eq!(s.phase(), Phase::Idle);
        s
    }

    #[test]
    fn applied_duplicates_are_dropped() {
        let mut s = mounted();
        assert!(!s.enqueue(vec![flag(ChangeKind::Loading, false, Policy::immediate(7))]));
        assert!(s.pending().is_empty());
        assert_eq!(s.stats().dropped, 1);
    }

    #[test]
    fn queued_duplicates_dropped_and_latest_wins() {
        let mut s = mounted();
        s.enqueue(vec![flag(ChangeKind::Disabled, true, Policy::deferred(6))]);
        s.enqueue(vec![flag(ChangeKind::Disabled, true, Policy::deferred(6))]);
        assert_eq!(s.pending().len(), 1);
        assert_eq!(s.stats().dropped, 1);

        s.enqueue(vec![flag(ChangeKind::Disabled, false, Policy::deferred(6))]);
        assert_eq!(s.pending().len(), 1);
        assert_eq!(s.pending()[0].new_value, Some(ChangeValue::Flag(false)));
        assert_eq!(s.stats().replaced, 1);
    }

    #[test]
    fn revert_to_applied_withdraws_queued_entry() {
        let mut s = mounted();
        assert!(!s.enqueue(vec![flag(ChangeKind::Loading, true, Policy::deferred(7))]));
        assert_eq!(names(s.pending()), [ChangeKind::Loading]);

        assert!(!s.enqueue(vec![flag(ChangeKind::Loading, false, Policy::deferred(7))]));
        assert!(s.pending().is_empty());
        assert_eq!(s.stats().replaced, 1);
        assert!(s.begin_deferred().is_empty());
        assert_eq!(s.applied(ChangeKind::Loading).and_then(|e| e.new_value.clone()), Some(ChangeValue::Flag(false)));
    }

    #[test]
    fn queue_is_sorted_and_split_by_timing() {
        let mut s = mounted();
        let immediate = s.enqueue(vec![
            flag(ChangeKind::Loading, true, Policy::immediate(7)),
            flag(ChangeKind::Records, true, Policy::deferred(1)),
            flag(ChangeKind::Query, true, Policy::immediate(4).unordered()),
            flag(ChangeKind::Selection, true, Policy::immediate(3)),
        ]);
        assert!(immediate);
        assert_eq!(
            names(s.pending()),
            [ChangeKind::Records, ChangeKind::Selection, ChangeKind::Loading, ChangeKind::Query]
        );

        let now = s.begin_immediate();
        assert_eq!(s.phase(), Phase::ApplyingImmediate);
        assert_eq!(names(&now), [ChangeKind::Selection, ChangeKind::Loading, ChangeKind::Query]);
        assert_eq!(names(s.pending()), [ChangeKind::Records]);
        assert!(s.applied(ChangeKind::Selection).is_some());
        assert!(s.applied(ChangeKind::Records).is_none());
    }

    #[test]
    fn one_idle_frame_per_batch() {
        let mut s = mounted();
        s.enqueue(vec![flag(ChangeKind::Selection, true, Policy::immediate(3))]);
        let now = s.begin_immediate();
        assert!(s.defer(now));
        s.finish();

        s.enqueue(vec![flag(ChangeKind::Width, true, Policy::immediate(4))]);
        let now = s.begin_immediate();
        assert!(!s.defer(now), "frame already outstanding");
        assert_eq!(names(s.batch()), [ChangeKind::Selection, ChangeKind::Width]);

        let all = s.begin_deferred();
        assert_eq!(s.phase(), Phase::ApplyingDeferred);
        assert_eq!(names(&all), [ChangeKind::Selection, ChangeKind::Width]);
        assert!(!s.idle_requested());
        assert!(s.batch().is_empty());
        s.finish();
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn deferred_only_work_requests_a_frame() {
        let mut s = mounted();
        assert!(!s.enqueue(vec![flag(ChangeKind::Records, true, Policy::deferred(1))]));
        assert!(s.request_deferred());
        assert!(!s.request_deferred());
        let all = s.begin_deferred();
        assert_eq!(names(&all), [ChangeKind::Records]);
        assert!(s.applied(ChangeKind::Records).is_some());
    }

    #[test]
    fn open_flushes_everything() {
        let mut s = mounted();
        s.enqueue(vec![flag(ChangeKind::Records, true, Policy::deferred(1))]);
        s.enqueue(vec![flag(ChangeKind::Selection, true, Policy::immediate(3))]);
        let now = s.begin_immediate();
        s.defer(now);
        let all = s.flush_for_open();
        assert_eq!(names(&all), [ChangeKind::Records, ChangeKind::Selection]);
        assert!(s.pending().is_empty() && s.batch().is_empty());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut s = mounted();
        let entry = flag(ChangeKind::Disabled, true, Policy::immediate(6));
        s.enqueue(vec![entry.clone()]);
        s.begin_immediate();
        s.finish();
        assert!(!s.enqueue(vec![entry]));
        assert!(s.pending().is_empty());
    }
}

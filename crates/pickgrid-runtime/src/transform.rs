#![forbid(unsafe_code)]

//! Per-property option transforms.
//!
//! Each [`ChangeKind`] maps to one function that takes the option list and
//! returns the updated list, marking options that must be recompiled or
//! resorted. Transforms never lay out or format anything themselves.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Selection not among the records | `warn!`, list unchanged |
//! | Managed search, selection cleared | List emptied |
//! | Managed search, unrelated query | List emptied |

use rustc_hash::FxHashSet;
use tracing::warn;

use pickgrid_core::RecordId;

use crate::change::{ChangeEntry, ChangeKind};
use crate::option::PickOption;
use crate::props::WidgetProps;

/// What a transform may consult besides the entry itself.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub props: &'a WidgetProps,
    pub managed_search: bool,
}

pub type TransformFn = fn(Vec<PickOption>, &ChangeEntry, &TransformContext<'_>) -> Vec<PickOption>;

/// The transform for `kind`.
#[must_use]
pub fn transform_for(kind: ChangeKind) -> TransformFn {
    match kind {
        ChangeKind::Records => records,
        ChangeKind::DisabledRecords => disabled_records,
        ChangeKind::Selection => selection,
        ChangeKind::Width | ChangeKind::TextTemplate | ChangeKind::OptionsTemplate => recompile_all,
        ChangeKind::DefaultSort
        | ChangeKind::DefaultSortDirection
        | ChangeKind::SortField
        | ChangeKind::SortDirection => resort_all,
        ChangeKind::Query => query,
        ChangeKind::Disabled
        | ChangeKind::Loading
        | ChangeKind::NoResultsMessage
        | ChangeKind::Options
        | ChangeKind::OpenedAt => identity,
    }
}

/// Run the transforms of `entries` in order, each on a fresh copy.
///
/// Entries whose policy is not applied directly are skipped.
#[must_use]
pub fn apply_transforms(
    options: &[PickOption],
    entries: &[ChangeEntry],
    ctx: &TransformContext<'_>,
) -> Vec<PickOption> {
    let mut current = options.to_vec();
    for entry in entries.iter().filter(|e| e.policy.apply_directly) {
        current = transform_for(entry.name)(current.clone(), entry, ctx);
    }
    current
}

fn identity(options: Vec<PickOption>, _: &ChangeEntry, _: &TransformContext<'_>) -> Vec<PickOption> {
    options
}

fn records(options: Vec<PickOption>, entry: &ChangeEntry, ctx: &TransformContext<'_>) -> Vec<PickOption> {
    let incoming = entry
        .new_value
        .as_ref()
        .and_then(|v| v.as_records())
        .unwrap_or_default();
    let wanted: FxHashSet<&RecordId> = incoming.iter().map(|r| r.id()).collect();

    let mut kept: Vec<PickOption> = options
        .into_iter()
        .filter(|o| o.id().is_some_and(|id| wanted.contains(id)))
        .collect();
    let present: FxHashSet<RecordId> = kept.iter().filter_map(|o| o.id().cloned()).collect();
    kept.extend(
        incoming
            .iter()
            .filter(|r| !present.contains(r.id()))
            .map(|r| PickOption::for_record(r.clone())),
    );
    refresh_disabled(kept, ctx)
}

fn disabled_records(options: Vec<PickOption>, _: &ChangeEntry, ctx: &TransformContext<'_>) -> Vec<PickOption> {
    refresh_disabled(options, ctx)
}

fn selection(options: Vec<PickOption>, entry: &ChangeEntry, ctx: &TransformContext<'_>) -> Vec<PickOption> {
    let Some(record) = entry.new_value.as_ref().and_then(|v| v.as_record()) else {
        if ctx.managed_search {
            return Vec::new();
        }
        return refresh_disabled(options, ctx);
    };

    if !ctx.props.records.iter().any(|r| r.id() == record.id()) {
        warn!(record = %record.id(), "selection not found among records");
        return options;
    }

    let mut options = options;
    if !options.iter().any(|o| o.id() == Some(record.id())) {
        options.insert(0, PickOption::for_record(record.clone()));
    }
    refresh_disabled(options, ctx)
}

fn recompile_all(mut options: Vec<PickOption>, _: &ChangeEntry, _: &TransformContext<'_>) -> Vec<PickOption> {
    for option in &mut options {
        option.needs_recompile = true;
    }
    options
}

fn resort_all(mut options: Vec<PickOption>, _: &ChangeEntry, _: &TransformContext<'_>) -> Vec<PickOption> {
    for option in &mut options {
        option.needs_resort = true;
    }
    options
}

fn query(options: Vec<PickOption>, entry: &ChangeEntry, ctx: &TransformContext<'_>) -> Vec<PickOption> {
    if !ctx.managed_search {
        return options;
    }
    let new = entry.new_value.as_ref().and_then(|v| v.as_text()).unwrap_or_default();
    let old = entry.old_value.as_ref().and_then(|v| v.as_text()).unwrap_or_default();
    if is_refinement(old, new) {
        options
    } else {
        Vec::new()
    }
}

/// The shorter query is a prefix of the longer one.
#[must_use]
pub fn is_refinement(old: &str, new: &str) -> bool {
    let (short, long) = if old.len() <= new.len() { (old, new) } else { (new, old) };
    long.starts_with(short)
}

/// An option is disabled when its record is listed as disabled and is not
/// the current selection.
fn refresh_disabled(mut options: Vec<PickOption>, ctx: &TransformContext<'_>) -> Vec<PickOption> {
    let disabled: FxHashSet<&RecordId> = ctx.props.disabled_records.iter().map(|r| r.id()).collect();
    let selected = ctx.props.selection.as_ref().map(|r| r.id());
    for option in &mut options {
        let Some(id) = option.value.as_ref() else {
            continue;
        };
        let should = disabled.contains(id) && selected != Some(id);
        if option.disabled != should {
            option.disabled = should;
            option.needs_recompile = true;
            option.needs_resort = true;
        }
    }
    options
}

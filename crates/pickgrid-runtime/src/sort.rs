#![forbid(unsafe_code)]

//! Ordering passes over the option list.
//!
//! Applied in this order after a recompute: sort, disabled to the bottom,
//! selection to the top. Truncation happens last, when a frame is built.
//! Every pass is stable.

use std::cmp::Ordering;
use std::sync::Arc;

use pickgrid_core::{Field, RecordId, SortDirection, compare_records};
use pickgrid_layout::WidthTemplate;

use crate::option::PickOption;

/// Column header state of the option list.
#[derive(Debug, Clone, PartialEq)]
pub struct SortHeader {
    pub template: Arc<WidthTemplate>,
    pub field: Option<String>,
    pub direction: SortDirection,
}

/// Sort by `field` (or every column when `None`), disabled rows last.
///
/// Clears `needs_resort` on every option.
pub fn sort_options(options: &mut [PickOption], field: Option<&str>, direction: SortDirection, fields: &[Field]) {
    let sort_field = field.and_then(|id| fields.iter().find(|f| f.id() == id));
    options.sort_by(|a, b| {
        a.disabled.cmp(&b.disabled).then_with(|| match (&a.record, &b.record) {
            (Some(ra), Some(rb)) => compare_records(ra, rb, sort_field, fields, direction),
            _ => Ordering::Equal,
        })
    });
    for option in options.iter_mut() {
        option.needs_resort = false;
    }
}

/// Move disabled options after enabled ones.
pub fn disabled_to_bottom(options: &mut [PickOption]) {
    options.sort_by_key(|o| o.disabled);
}

/// Move the selected option to the front.
pub fn hoist_selection(options: &mut Vec<PickOption>, selection: Option<&RecordId>) {
    let Some(id) = selection else {
        return;
    };
    if let Some(pos) = options.iter().position(|o| o.id() == Some(id)) {
        let selected = options.remove(pos);
        options.insert(0, selected);
    }
}

/// Cap the list at `max`, ending it with a refine-filter row when cut.
pub fn truncate_with_sentinel(options: &mut Vec<PickOption>, max: usize) {
    if options.len() > max {
        options.truncate(max);
        options.push(PickOption::refine_filter());
    }
}

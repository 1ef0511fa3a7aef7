#![forbid(unsafe_code)]

//! Host props and internal render state, with their scheduling policies.

use std::sync::Arc;

use pickgrid_core::{RecordRef, SortDirection};
use pickgrid_layout::WidthTemplate;

use crate::change::{
    ChangeKind, ChangeValue, Policy, PolicyMap, dedup_records, record_sets_differ, selection_differs,
};
use crate::diff::Snapshot;

/// Configuration handed to the picker by its host.
#[derive(Debug, Clone, Default)]
pub struct WidgetProps {
    pub records: Arc<[RecordRef]>,
    pub disabled_records: Arc<[RecordRef]>,
    pub selection: Option<RecordRef>,
    /// Container width; the picker default applies when absent.
    pub width_px: Option<f64>,
    /// Host override for the selected-value template.
    pub text_template: Option<Arc<WidthTemplate>>,
    /// Host override for the option-list template.
    pub options_template: Option<Arc<WidthTemplate>>,
    pub disabled: bool,
    pub loading: bool,
    pub no_results_message: Option<String>,
    pub default_sort: Option<String>,
    pub default_sort_direction: SortDirection,
}

impl WidgetProps {
    #[must_use]
    pub fn new(records: impl Into<Arc<[RecordRef]>>) -> Self {
        Self {
            records: records.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_records(mut self, records: impl Into<Arc<[RecordRef]>>) -> Self {
        self.records = records.into();
        self
    }

    #[must_use]
    pub fn with_disabled_records(mut self, records: impl Into<Arc<[RecordRef]>>) -> Self {
        self.disabled_records = records.into();
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Option<RecordRef>) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width_px: f64) -> Self {
        self.width_px = Some(width_px);
        self
    }

    #[must_use]
    pub fn with_text_template(mut self, template: Arc<WidthTemplate>) -> Self {
        self.text_template = Some(template);
        self
    }

    #[must_use]
    pub fn with_options_template(mut self, template: Arc<WidthTemplate>) -> Self {
        self.options_template = Some(template);
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn with_no_results_message(mut self, message: impl Into<String>) -> Self {
        self.no_results_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_default_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = Some(field.into());
        self.default_sort_direction = direction;
        self
    }
}

impl Snapshot for WidgetProps {
    fn keys(&self) -> Vec<ChangeKind> {
        ChangeKind::PROPS
            .into_iter()
            .filter(|kind| *kind != ChangeKind::Width || self.width_px.is_some())
            .collect()
    }

    fn value(&self, kind: ChangeKind) -> Option<ChangeValue> {
        let value = match kind {
            ChangeKind::Records => ChangeValue::Records(Arc::clone(&self.records)),
            ChangeKind::DisabledRecords => ChangeValue::Records(Arc::clone(&self.disabled_records)),
            ChangeKind::Selection => ChangeValue::Record(self.selection.clone()),
            ChangeKind::Width => ChangeValue::Width(self.width_px?),
            ChangeKind::TextTemplate => ChangeValue::Template(self.text_template.clone()),
            ChangeKind::OptionsTemplate => ChangeValue::Template(self.options_template.clone()),
            ChangeKind::Disabled => ChangeValue::Flag(self.disabled),
            ChangeKind::Loading => ChangeValue::Flag(self.loading),
            ChangeKind::NoResultsMessage => ChangeValue::Text(self.no_results_message.clone()),
            ChangeKind::DefaultSort => ChangeValue::Text(self.default_sort.clone()),
            ChangeKind::DefaultSortDirection => ChangeValue::Direction(self.default_sort_direction),
            ChangeKind::Options
            | ChangeKind::OpenedAt
            | ChangeKind::Query
            | ChangeKind::SortField
            | ChangeKind::SortDirection => return None,
        };
        Some(value)
    }
}

/// Picker-owned render state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    /// Bumped whenever the compiled option list is replaced.
    pub options_generation: u64,
    /// Sequence number of the most recent open.
    pub opened_at: Option<u64>,
    pub query: String,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
}

impl Snapshot for WidgetState {
    fn keys(&self) -> Vec<ChangeKind> {
        ChangeKind::STATE
            .into_iter()
            .filter(|kind| *kind != ChangeKind::OpenedAt || self.opened_at.is_some())
            .collect()
    }

    fn value(&self, kind: ChangeKind) -> Option<ChangeValue> {
        let value = match kind {
            ChangeKind::Options => ChangeValue::Generation(self.options_generation),
            ChangeKind::OpenedAt => ChangeValue::Timestamp(self.opened_at?),
            ChangeKind::Query => ChangeValue::Text(Some(self.query.clone())),
            ChangeKind::SortField => ChangeValue::Text(self.sort_field.clone()),
            ChangeKind::SortDirection => ChangeValue::Direction(self.sort_direction),
            _ => return None,
        };
        Some(value)
    }
}

/// Scheduling policies for [`WidgetProps`].
#[must_use]
pub fn props_policies() -> PolicyMap {
    PolicyMap::new()
        .with(
            ChangeKind::Records,
            Policy::deferred(1)
                .with_normalize(dedup_records)
                .with_delta(record_sets_differ),
        )
        .with(
            ChangeKind::DisabledRecords,
            Policy::immediate(2)
                .with_normalize(dedup_records)
                .with_delta(record_sets_differ),
        )
        .with(ChangeKind::Selection, Policy::immediate(3).with_delta(selection_differs))
        .with(ChangeKind::Width, Policy::immediate(4))
        .with(ChangeKind::TextTemplate, Policy::immediate(5))
        .with(ChangeKind::OptionsTemplate, Policy::immediate(5))
        .with(ChangeKind::Disabled, Policy::immediate(6).chrome_only())
        .with(ChangeKind::Loading, Policy::immediate(7).chrome_only())
        .with(ChangeKind::NoResultsMessage, Policy::immediate(8).chrome_only())
        .with(ChangeKind::DefaultSort, Policy::immediate(9))
        .with(ChangeKind::DefaultSortDirection, Policy::immediate(10))
}

/// Scheduling policies for [`WidgetState`].
#[must_use]
pub fn state_policies() -> PolicyMap {
    PolicyMap::new()
        .with(ChangeKind::Options, Policy::immediate(2).not_applied_directly())
        .with(ChangeKind::OpenedAt, Policy::immediate(3))
        .with(ChangeKind::Query, Policy::immediate(4))
        .with(ChangeKind::SortField, Policy::immediate(5))
        .with(ChangeKind::SortDirection, Policy::immediate(6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickgrid_core::Record;

    #[test]
    fn width_key_only_when_set() {
        let props = WidgetProps::default();
        assert!(!props.keys().contains(&ChangeKind::Width));
        assert!(props.value(ChangeKind::Width).is_none());
        let props = props.with_width(320.0);
        assert_eq!(props.value(ChangeKind::Width), Some(ChangeValue::Width(320.0)));
    }

    #[test]
    fn props_have_no_state_values() {
        let props = WidgetProps::new(vec![Arc::new(Record::new("a"))]);
        for kind in ChangeKind::STATE {
            assert!(props.value(kind).is_none());
        }
    }

    #[test]
    fn every_property_has_a_policy() {
        let props = props_policies();
        assert!(ChangeKind::PROPS.iter().all(|k| props.get(*k).is_some()));
        let state = state_policies();
        assert!(ChangeKind::STATE.iter().all(|k| state.get(*k).is_some()));
        assert!(!state.get(ChangeKind::Options).is_some_and(|p| p.apply_directly));
    }
}

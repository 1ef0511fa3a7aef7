#![forbid(unsafe_code)]

//! The picker: host events in, frames and effects out.
//!
//! Every event diffs the relevant snapshot, hands the entries to the
//! [`UpdateScheduler`], and runs whatever it releases through the option
//! transforms. Each call returns an [`Update`] holding the frame to render
//! and the effects the host must carry out.
//!
//! # Paths
//!
//! - **Open**: outstanding work is flushed and applied to the full option
//!   list before it is shown.
//! - **Closed**: only the selected-value row is refreshed; the full list is
//!   rebuilt on the next idle frame ([`Effect::RequestIdleFrame`]).
//! - **Chrome-only** changes (disabled, loading, no-results message) never
//!   touch the option list.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Formatter fails during layout or compile | `warn!`, previous options kept |
//! | Chosen value not among records | `warn!`, no effect |
//! | Non-empty query under `min_characters` | Ignored |

use std::sync::Arc;

use pickgrid_core::{Field, RecordId, RecordRef, SortDirection};
use pickgrid_layout::{Container, LayoutError, WidthTemplate};
use pickgrid_search::SearchProfile;
use tracing::{debug, warn};

use crate::change::{ChangeEntry, ChangeKind};
use crate::config::PickerConfig;
use crate::diff::diff;
use crate::engine::Engine;
use crate::option::PickOption;
use crate::props::{WidgetProps, WidgetState, props_policies, state_policies};
use crate::scheduler::{Phase, UpdateScheduler};
use crate::sort::{SortHeader, disabled_to_bottom, hoist_selection, sort_options, truncate_with_sentinel};
use crate::transform::{TransformContext, apply_transforms, is_refinement};

/// Work the host performs on the picker's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call [`Picker::on_idle`] on the next idle frame.
    RequestIdleFrame,
    /// The user chose `record`.
    Select {
        record: RecordRef,
        previous: Option<RecordRef>,
    },
    /// Drop the current selection.
    ClearSelection(RecordId),
    SearchCleared,
    /// An accepted query, for hosts that source records from it.
    QueryChanged(String),
}

/// Surroundings of the option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chrome {
    pub disabled: bool,
    pub loading: bool,
    pub no_results_message: Option<String>,
    /// Open, not loading, and nothing to show.
    pub show_no_results: bool,
}

/// Everything the host needs to render the picker.
#[derive(Debug, Clone)]
pub struct Frame {
    pub phase: Phase,
    pub is_open: bool,
    /// Visible options: searched, capped, possibly ending in a
    /// refine-filter row. Empty while closed.
    pub options: Vec<PickOption>,
    /// The selected-value row, laid out against the text template.
    pub selected: Option<PickOption>,
    pub text_template: Option<Arc<WidthTemplate>>,
    pub options_template: Option<Arc<WidthTemplate>>,
    pub header: Option<SortHeader>,
    pub chrome: Chrome,
    pub query: String,
}

/// Result of one picker event.
#[derive(Debug, Clone)]
pub struct Update {
    pub frame: Frame,
    pub effects: Vec<Effect>,
}

/// A searchable, multi-column record picker.
#[derive(Debug)]
pub struct Picker {
    id: Arc<str>,
    fields: Vec<Field>,
    profile: SearchProfile,
    config: PickerConfig,
    scheduler: UpdateScheduler,
    props: WidgetProps,
    state: WidgetState,
    options: Vec<PickOption>,
    selected: Option<PickOption>,
    text_template: Option<Arc<WidthTemplate>>,
    options_template: Option<Arc<WidthTemplate>>,
    header: Option<SortHeader>,
    is_open: bool,
    opens: u64,
}

impl Picker {
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>, fields: Vec<Field>, profile: SearchProfile, config: PickerConfig) -> Self {
        Self {
            id: id.into(),
            fields,
            profile,
            config,
            scheduler: UpdateScheduler::new(),
            props: WidgetProps::default(),
            state: WidgetState::default(),
            options: Vec::new(),
            selected: None,
            text_template: None,
            options_template: None,
            header: None,
            is_open: false,
            opens: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    #[must_use]
    pub fn props(&self) -> &WidgetProps {
        &self.props
    }

    #[must_use]
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// The full compiled option list, before search and truncation.
    #[must_use]
    pub fn options(&self) -> &[PickOption] {
        &self.options
    }

    #[must_use]
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// First snapshot: everything is applied synchronously.
    pub fn mount(&mut self, props: WidgetProps, engine: &mut Engine) -> Update {
        let entries = diff(&props, None, &props_policies());
        let state_entries = diff(&self.state, None, &state_policies());
        self.props = props;
        self.scheduler.mount(&entries);
        self.scheduler.mark_applied(&state_entries);
        debug!(picker = %self.id, records = self.props.records.len(), "mounted");

        self.recompute(&entries, engine);
        self.refresh_selected(engine);
        self.update(Vec::new(), engine)
    }

    /// A new props snapshot from the host.
    pub fn on_snapshot(&mut self, props: WidgetProps, engine: &mut Engine) -> Update {
        let entries = diff(&props, Some(&self.props), &props_policies());
        self.props = props;
        self.schedule(entries, engine)
    }

    pub fn on_open(&mut self, engine: &mut Engine) -> Update {
        self.is_open = true;
        self.opens += 1;
        let opened = WidgetState {
            opened_at: Some(self.opens),
            ..self.state.clone()
        };
        let entries = self.stage_state(opened);
        self.scheduler.enqueue(entries);

        let all = self.scheduler.flush_for_open();
        debug!(picker = %self.id, flushed = all.len(), "opened");
        self.recompute(&all, engine);
        self.refresh_selected(engine);
        self.scheduler.finish();
        self.update(Vec::new(), engine)
    }

    pub fn on_close(&mut self, engine: &mut Engine) -> Update {
        self.is_open = false;
        self.update(Vec::new(), engine)
    }

    /// The search text changed.
    pub fn on_query(&mut self, query: &str, engine: &mut Engine) -> Update {
        if !query.is_empty() && query.chars().count() < self.config.min_characters {
            return self.update(Vec::new(), engine);
        }

        let mut effects = Vec::new();
        if self.config.managed_search && !is_refinement(&self.state.query, query) {
            if let Some(selection) = &self.props.selection {
                effects.push(Effect::ClearSelection(selection.id().clone()));
            }
            effects.push(Effect::SearchCleared);
        }
        effects.push(Effect::QueryChanged(query.to_owned()));

        let queried = WidgetState {
            query: query.to_owned(),
            ..self.state.clone()
        };
        let entries = self.stage_state(queried);
        let mut update = self.schedule(entries, engine);
        effects.append(&mut update.effects);
        update.effects = effects;
        update
    }

    /// The user picked an option (`Some(id)`) or cleared the value (`None`).
    pub fn on_choose(&mut self, value: Option<&str>, engine: &mut Engine) -> Update {
        let previous = self.props.selection.clone();
        let mut effects = Vec::new();
        match value {
            Some(id) => match self.props.records.iter().find(|r| r.id().as_str() == id) {
                Some(record) => effects.push(Effect::Select {
                    record: Arc::clone(record),
                    previous,
                }),
                None => warn!(picker = %self.id, record = id, "chosen value not found among records"),
            },
            None => {
                if let Some(previous) = previous {
                    effects.push(Effect::ClearSelection(previous.id().clone()));
                    effects.push(Effect::SearchCleared);
                }
            }
        }
        self.update(effects, engine)
    }

    /// Header click: same column toggles direction, a new column sorts
    /// ascending.
    pub fn on_sort(&mut self, field: &str, engine: &mut Engine) -> Update {
        let direction = if self.state.sort_field.as_deref() == Some(field) {
            self.state.sort_direction.toggle()
        } else {
            SortDirection::Ascending
        };
        let sorted = WidgetState {
            sort_field: Some(field.to_owned()),
            sort_direction: direction,
            ..self.state.clone()
        };
        let entries = self.stage_state(sorted);
        self.schedule(entries, engine)
    }

    /// The idle frame requested through [`Effect::RequestIdleFrame`].
    pub fn on_idle(&mut self, engine: &mut Engine) -> Update {
        let entries = self.scheduler.begin_deferred();
        debug!(picker = %self.id, entries = entries.len(), "idle frame");
        self.recompute(&entries, engine);
        self.refresh_selected(engine);
        self.scheduler.finish();
        self.update(Vec::new(), engine)
    }

    fn schedule(&mut self, entries: Vec<ChangeEntry>, engine: &mut Engine) -> Update {
        let mut effects = Vec::new();
        if self.scheduler.enqueue(entries) {
            let to_process = self.scheduler.begin_immediate();
            let work: Vec<ChangeEntry> = to_process.into_iter().filter(|e| !e.policy.chrome_only).collect();
            if !work.is_empty() {
                self.refresh_selected(engine);
                if self.is_open {
                    self.recompute(&work, engine);
                } else if self.scheduler.defer(work) {
                    effects.push(Effect::RequestIdleFrame);
                }
            }
            self.scheduler.finish();
        }
        if self.scheduler.request_deferred() {
            effects.push(Effect::RequestIdleFrame);
        }
        self.update(effects, engine)
    }

    /// Apply `entries` to the full option list, then lay out, sort and
    /// order it.
    fn recompute(&mut self, entries: &[ChangeEntry], engine: &mut Engine) {
        let ctx = TransformContext {
            props: &self.props,
            managed_search: self.config.managed_search,
        };
        let mut options = apply_transforms(&self.options, entries, &ctx);

        if entries.iter().any(|e| e.name == ChangeKind::Width) {
            engine.layout.forget_container(&self.container_id("text"));
            engine.layout.forget_container(&self.container_id("options"));
        }

        if options.iter().any(|o| o.needs_recompile) || self.header.is_none() {
            let template = match self.allocate_options(engine) {
                Ok(template) => template,
                Err(err) => {
                    warn!(picker = %self.id, error = %err, "option layout failed, keeping previous options");
                    return;
                }
            };
            let fresh = self.options_template.as_ref() != Some(&template);
            for option in options.iter_mut().filter(|o| fresh || o.needs_recompile) {
                if let Err(err) = option.compile(&template, &self.fields, &self.profile, engine) {
                    warn!(picker = %self.id, error = %err, "option compile failed, keeping previous options");
                    return;
                }
            }
            if fresh || self.header.is_none() {
                self.reset_sort();
                for option in &mut options {
                    option.needs_resort = true;
                }
            }
            self.options_template = Some(template);
        }

        if options.iter().any(|o| o.needs_resort) {
            sort_options(
                &mut options,
                self.state.sort_field.as_deref(),
                self.state.sort_direction,
                &self.fields,
            );
        }
        disabled_to_bottom(&mut options);
        hoist_selection(&mut options, self.props.selection.as_ref().map(|r| r.id()));

        self.header = self.options_template.clone().map(|template| SortHeader {
            template,
            field: self.state.sort_field.clone(),
            direction: self.state.sort_direction,
        });
        self.options = options;

        let bumped = WidgetState {
            options_generation: self.state.options_generation + 1,
            ..self.state.clone()
        };
        let applied = self.stage_state(bumped);
        self.scheduler.mark_applied(&applied);
    }

    /// Rebuild the selected-value row against the text template.
    fn refresh_selected(&mut self, engine: &mut Engine) {
        let Some(record) = self.props.selection.clone() else {
            self.selected = None;
            return;
        };
        if !self.props.records.iter().any(|r| r.id() == record.id()) {
            debug!(picker = %self.id, record = %record.id(), "selection not among records, keeping previous row");
            return;
        }
        let template = match self.allocate_text(engine) {
            Ok(template) => template,
            Err(err) => {
                warn!(picker = %self.id, error = %err, "text layout failed, keeping previous selection row");
                return;
            }
        };
        let mut option = PickOption::for_record(record);
        if let Err(err) = option.compile(&template, &self.fields, &self.profile, engine) {
            warn!(picker = %self.id, error = %err, "selection compile failed, keeping previous selection row");
            return;
        }
        option.needs_resort = false;
        option.active = true;
        self.text_template = Some(template);
        self.selected = Some(option);
    }

    /// A fresh option template restores the host's default sort.
    fn reset_sort(&mut self) {
        let field = self
            .props
            .default_sort
            .clone()
            .or_else(|| self.fields.first().map(|f| f.id().to_owned()));
        let reset = WidgetState {
            sort_field: field,
            sort_direction: self.props.default_sort_direction,
            ..self.state.clone()
        };
        let applied = self.stage_state(reset);
        self.scheduler.mark_applied(&applied);
    }

    /// Replace the state, returning the entries that describe the change.
    fn stage_state(&mut self, next: WidgetState) -> Vec<ChangeEntry> {
        let entries = diff(&next, Some(&self.state), &state_policies());
        self.state = next;
        entries
    }

    fn width(&self) -> f64 {
        self.props.width_px.unwrap_or(self.config.default_width_px)
    }

    fn container_id(&self, part: &str) -> String {
        format!("{}:{part}", self.id)
    }

    fn container(&self, part: &str) -> Container {
        Container::new(self.container_id(part), self.width()).with_font(self.config.font.clone())
    }

    fn allocate_options(&self, engine: &mut Engine) -> Result<Arc<WidthTemplate>, LayoutError> {
        if let Some(template) = &self.props.options_template {
            return Ok(Arc::clone(template));
        }
        engine.layout.allocate(
            &self.props.records,
            &self.fields,
            &self.container("options"),
            self.config.show_headers,
            false,
        )
    }

    fn allocate_text(&self, engine: &mut Engine) -> Result<Arc<WidthTemplate>, LayoutError> {
        if let Some(template) = &self.props.text_template {
            return Ok(Arc::clone(template));
        }
        let records: Vec<RecordRef> = self.props.selection.iter().cloned().collect();
        engine
            .layout
            .allocate(&records, &self.fields, &self.container("text"), false, true)
    }

    fn update(&self, effects: Vec<Effect>, engine: &mut Engine) -> Update {
        Update {
            frame: self.frame(engine),
            effects,
        }
    }

    fn frame(&self, engine: &mut Engine) -> Frame {
        let options = if self.is_open {
            let mut visible = engine
                .searcher
                .search(&self.state.query, self.options.clone(), &self.profile);
            truncate_with_sentinel(&mut visible, self.config.max_options);
            visible
        } else {
            Vec::new()
        };
        let chrome = Chrome {
            disabled: self.props.disabled,
            loading: self.props.loading,
            no_results_message: self.props.no_results_message.clone(),
            show_no_results: self.is_open && !self.props.loading && options.is_empty(),
        };
        Frame {
            phase: self.scheduler.phase(),
            is_open: self.is_open,
            options,
            selected: self.selected.clone(),
            text_template: self.text_template.clone(),
            options_template: self.options_template.clone(),
            header: self.header.clone(),
            chrome,
            query: self.state.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickgrid_core::Record;

    fn fields() -> Vec<Field> {
        vec![Field::new("ticker", "Ticker"), Field::new("name", "Name").truncatable()]
    }

    fn rec(id: &str, ticker: &str, name: &str) -> RecordRef {
        Arc::new(Record::new(id).with("ticker", ticker).with("name", name))
    }

    fn picker() -> Picker {
        Picker::new("p", fields(), SearchProfile::for_fields(&fields()), PickerConfig::default())
    }

    fn keys(options: &[PickOption]) -> Vec<&str> {
        options.iter().map(|o| o.key.as_str()).collect()
    }

    #[test]
    fn mount_compiles_and_sorts_by_first_field() {
        let mut engine = Engine::default();
        let mut p = picker();
        let update = p.mount(
            WidgetProps::new(vec![rec("2", "MSFT", "Microsoft"), rec("1", "AAPL", "Apple")]),
            &mut engine,
        );
        assert!(update.effects.is_empty());
        assert_eq!(keys(p.options()), ["1", "2"]);
        assert!(p.options().iter().all(|o| !o.needs_recompile && !o.needs_resort));
        assert_eq!(p.state().sort_field.as_deref(), Some("ticker"));
        assert!(update.frame.header.is_some());
        assert!(update.frame.options.is_empty(), "closed picker shows no list");
    }

    #[test]
    fn on_sort_toggles_direction() {
        let mut engine = Engine::default();
        let mut p = picker();
        p.mount(
            WidgetProps::new(vec![rec("1", "AAPL", "Apple"), rec("2", "MSFT", "Microsoft")]),
            &mut engine,
        );
        p.on_open(&mut engine);

        let update = p.on_sort("ticker", &mut engine);
        assert_eq!(p.state().sort_direction, SortDirection::Descending);
        assert_eq!(keys(&update.frame.options), ["2", "1"]);

        let update = p.on_sort("name", &mut engine);
        assert_eq!(p.state().sort_direction, SortDirection::Ascending);
        assert_eq!(update.frame.header.map(|h| h.field), Some(Some("name".to_owned())));
    }

    #[test]
    fn min_characters_ignores_short_queries() {
        let mut engine = Engine::default();
        let mut p = Picker::new(
            "p",
            fields(),
            SearchProfile::for_fields(&fields()),
            PickerConfig::default().with_min_characters(2),
        );
        p.mount(WidgetProps::new(vec![rec("1", "AAPL", "Apple")]), &mut engine);
        let update = p.on_query("a", &mut engine);
        assert!(update.effects.is_empty());
        assert_eq!(p.state().query, "");

        // Closed: the list itself is rebuilt on the idle frame.
        let update = p.on_query("ap", &mut engine);
        assert_eq!(
            update.effects,
            [Effect::QueryChanged("ap".to_owned()), Effect::RequestIdleFrame]
        );
        assert_eq!(p.state().query, "ap");
    }

    #[test]
    fn choose_resolves_records() {
        let mut engine = Engine::default();
        let mut p = picker();
        let apple = rec("1", "AAPL", "Apple");
        p.mount(WidgetProps::new(vec![Arc::clone(&apple)]), &mut engine);

        let update = p.on_choose(Some("1"), &mut engine);
        assert_eq!(
            update.effects,
            [Effect::Select {
                record: apple,
                previous: None
            }]
        );
        assert!(p.on_choose(Some("nope"), &mut engine).effects.is_empty());
        assert!(p.on_choose(None, &mut engine).effects.is_empty());
    }
}

#![forbid(unsafe_code)]

//! Options: one selectable row per record.

use std::sync::Arc;

use pickgrid_core::{Field, FormatError, Record, RecordId, RecordRef};
use pickgrid_layout::WidthTemplate;
use pickgrid_search::{Keyword, SearchProfile, Searchable};

use crate::engine::Engine;

/// Key of the row appended when the list is truncated.
pub const REFINE_FILTER_KEY: &str = "refineFilter";

/// Text of the refine-filter row.
pub const REFINE_FILTER_TEXT: &str = "Please further refine filter; results are truncated";

/// One laid-out cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    pub field_id: String,
    pub text: Arc<str>,
    pub width_px: u32,
}

/// A row in the option list.
#[derive(Debug, Clone)]
pub struct PickOption {
    pub key: String,
    pub value: Option<RecordId>,
    /// Visible cell text joined by spaces.
    pub display_text: String,
    pub keywords: Arc<[Keyword]>,
    pub disabled: bool,
    pub needs_recompile: bool,
    pub needs_resort: bool,
    pub record: Option<RecordRef>,
    pub active: bool,
    pub cells: Vec<RowCell>,
}

impl PickOption {
    /// An uncompiled option for `record`, flagged for compile and sort.
    #[must_use]
    pub fn for_record(record: RecordRef) -> Self {
        Self {
            key: record.id().to_string(),
            value: Some(record.id().clone()),
            display_text: String::new(),
            keywords: Arc::from(Vec::new()),
            disabled: false,
            needs_recompile: true,
            needs_resort: true,
            record: Some(record),
            active: false,
            cells: Vec::new(),
        }
    }

    #[must_use]
    pub fn refine_filter() -> Self {
        Self {
            key: REFINE_FILTER_KEY.to_owned(),
            value: None,
            display_text: REFINE_FILTER_TEXT.to_owned(),
            keywords: Arc::from(Vec::new()),
            disabled: true,
            needs_recompile: false,
            needs_resort: false,
            record: None,
            active: false,
            cells: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_refine_filter(&self) -> bool {
        self.record.is_none() && self.key == REFINE_FILTER_KEY
    }

    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        self.value.as_ref()
    }

    /// Lay the record out against `template` and rebuild its keywords.
    ///
    /// Clears `needs_recompile` on success; on failure the option keeps its
    /// previous cells.
    pub fn compile(
        &mut self,
        template: &WidthTemplate,
        fields: &[Field],
        profile: &SearchProfile,
        engine: &mut Engine,
    ) -> Result<(), FormatError> {
        let Some(record) = self.record.clone() else {
            self.needs_recompile = false;
            return Ok(());
        };

        let mut cells = Vec::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            cells.push(RowCell {
                field_id: field.id().to_owned(),
                text: engine.layout.format(field, &record)?,
                width_px: template.get(i).unwrap_or(0),
            });
        }
        let keywords = engine
            .keywords
            .keywords(&record, fields, profile, engine.layout.formats_mut())?;

        self.display_text = cells
            .iter()
            .filter(|c| c.width_px > 0 && !c.text.is_empty())
            .map(|c| c.text.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.cells = cells;
        self.keywords = keywords;
        self.needs_recompile = false;
        Ok(())
    }
}

impl Searchable for PickOption {
    fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    fn record(&self) -> Option<&Record> {
        self.record.as_deref()
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickgrid_core::Value;

    fn fields() -> Vec<Field> {
        vec![Field::new("ticker", "Ticker"), Field::new("name", "Name").hideable()]
    }

    fn record() -> RecordRef {
        Arc::new(Record::new("A").with("ticker", "AAPL").with("name", "Apple Inc"))
    }

    #[test]
    fn stub_is_dirty() {
        let option = PickOption::for_record(record());
        assert_eq!(option.key, "A");
        assert!(option.needs_recompile && option.needs_resort);
        assert!(option.cells.is_empty());
    }

    #[test]
    fn compile_lays_out_cells() {
        let mut engine = Engine::default();
        let mut option = PickOption::for_record(record());
        let profile = SearchProfile::for_fields(&fields());
        option
            .compile(&WidthTemplate::new(vec![40, 0]), &fields(), &profile, &mut engine)
            .unwrap();
        assert!(!option.needs_recompile);
        assert_eq!(option.cells.len(), 2);
        assert_eq!(option.cells[0].width_px, 40);
        // Hidden columns are not part of the display text but stay searchable.
        assert_eq!(option.display_text, "AAPL");
        assert_eq!(option.keywords.len(), 2);
    }

    #[test]
    fn failed_compile_keeps_previous_cells() {
        let failing = vec![Field::new("ticker", "Ticker").with_formatter(|_: Option<&Value>, _: &Record| {
            Err("bad".to_owned())
        })];
        let mut engine = Engine::default();
        let mut option = PickOption::for_record(record());
        let profile = SearchProfile::for_fields(&failing);
        assert!(option.compile(&WidthTemplate::new(vec![40]), &failing, &profile, &mut engine).is_err());
        assert!(option.needs_recompile);
        assert!(option.cells.is_empty());
    }

    #[test]
    fn refine_filter_is_inert() {
        let option = PickOption::refine_filter();
        assert!(option.is_refine_filter());
        assert!(option.disabled);
        assert!(Searchable::record(&option).is_none());
    }
}

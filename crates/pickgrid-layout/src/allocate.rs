#![forbid(unsafe_code)]

//! The allocation entry point.
//!
//! [`LayoutEngine`] owns every cache allocation touches (formatted text,
//! measured widths, templates, budgets) together with the host's
//! [`TextMeasurer`]. It is passed explicitly into each call; there is no
//! process-wide state.
//!
//! # Algorithm
//!
//! 1. Digest the sorted record ids, field list, `show_headers`, `contain`
//!    and container width. A cached template for that digest is returned
//!    as-is.
//! 2. In contain mode the usable budget is
//!    `container width - fields * column_margin_px`, resolved once per
//!    `(container, contain)`.
//! 3. Each field's natural width is
//!    `max(header width if show_headers, widest formatted value) + padding`,
//!    plus one margin outside contain mode. Only records that have data for
//!    the field are measured.
//! 4. A field no record has data for is zero-width, unless headers are shown,
//!    in which case it keeps its header width plus padding.
//! 5. Overflow is resolved and rounded by [`crate::solve`].
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Formatter fails | `LayoutError::Format`, nothing cached |
//! | No records | All zeros, or header widths with `show_headers` |
//! | Budget below margins | All zeros |

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use pickgrid_core::{Field, FormatError, Record, RecordRef};
use pickgrid_text::{CacheStats, FontSpec, FormatCache, TextMeasurer, WidthCache};
use rustc_hash::FxHasher;
use tracing::{debug, trace};

use crate::cache::{LayoutCache, TemplateKey};
use crate::solve::{ColumnDemand, solve_with_resolution};
use crate::{LayoutConfig, LayoutError, WidthTemplate};

/// Where a template will be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: Arc<str>,
    pub width_px: f64,
    pub font: FontSpec,
}

impl Container {
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>, width_px: f64) -> Self {
        Self {
            id: id.into(),
            width_px,
            font: FontSpec::default(),
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }
}

/// Caches plus measurer for width allocation.
pub struct LayoutEngine {
    config: LayoutConfig,
    measurer: Box<dyn TextMeasurer>,
    widths: WidthCache,
    formats: FormatCache,
    cache: LayoutCache,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(config: LayoutConfig, measurer: impl TextMeasurer + 'static) -> Self {
        let widths = WidthCache::new(config.width_capacity);
        let formats = FormatCache::new(config.format_capacity);
        let cache = LayoutCache::new(config.template_capacity, config.budget_capacity);
        Self {
            config,
            measurer: Box::new(measurer),
            widths,
            formats,
            cache,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Allocate one width per field for `records` inside `container`.
    pub fn allocate(
        &mut self,
        records: &[RecordRef],
        fields: &[Field],
        container: &Container,
        show_headers: bool,
        contain: bool,
    ) -> Result<Arc<WidthTemplate>, LayoutError> {
        let key = TemplateKey {
            container: Arc::clone(&container.id),
            digest: digest(records, fields, container, show_headers, contain),
        };
        if let Some(template) = self.cache.template(&key) {
            trace!(container = %container.id, "template cache hit");
            return Ok(template);
        }

        let columns = self.measure_columns(records, fields, &container.font, show_headers, contain)?;
        let budget = contain.then(|| {
            let margin = self.config.column_margin_px;
            let (width, count) = (container.width_px, fields.len());
            self.cache
                .budget(&container.id, true, width, count, || width - count as f64 * margin)
        });

        let (widths, resolution) = solve_with_resolution(&columns, budget);
        debug!(
            container = %container.id,
            records = records.len(),
            fields = fields.len(),
            budget = ?budget,
            hidden = resolution.hidden,
            truncated = resolution.truncated,
            squeezed = resolution.squeezed,
            "template allocated"
        );

        let template = Arc::new(WidthTemplate::new(widths));
        self.cache.store(key, Arc::clone(&template));
        Ok(template)
    }

    fn measure_columns(
        &mut self,
        records: &[RecordRef],
        fields: &[Field],
        font: &FontSpec,
        show_headers: bool,
        contain: bool,
    ) -> Result<Vec<ColumnDemand>, FormatError> {
        let padding = self.config.cell_padding_px;
        let margin = if contain { 0.0 } else { self.config.column_margin_px };

        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            let header = if show_headers {
                self.widths.get_or_measure(field.header(), font, self.measurer.as_ref())
            } else {
                0.0
            };

            let mut data: Option<f64> = None;
            for record in records.iter().filter(|r| field.has_data(r)) {
                let text = self.formats.format(field, record)?;
                let width = self.widths.get_or_measure(&text, font, self.measurer.as_ref());
                data = Some(data.map_or(width, |d| d.max(width)));
            }

            let natural = match data {
                Some(d) => header.max(d) + padding + margin,
                None if show_headers => header + padding + margin,
                None => 0.0,
            };
            columns.push(ColumnDemand {
                natural,
                hideable: field.is_hideable(),
                truncatable: field.is_truncatable(),
                no_data: data.is_none(),
            });
        }
        Ok(columns)
    }

    /// Formatted display text through the shared format cache.
    pub fn format(&mut self, field: &Field, record: &Record) -> Result<Arc<str>, FormatError> {
        self.formats.format(field, record)
    }

    /// The shared format cache.
    pub fn formats_mut(&mut self) -> &mut FormatCache {
        &mut self.formats
    }

    /// Measure `text` through the shared width cache.
    pub fn measure(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.widths.get_or_measure(text, font, self.measurer.as_ref())
    }

    /// Drop cached templates and budgets for one container, e.g. after the
    /// host reports a width change.
    pub fn forget_container(&mut self, container: &str) {
        self.cache.forget_container(container);
    }

    #[must_use]
    pub fn template_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn width_stats(&self) -> CacheStats {
        self.widths.stats()
    }

    #[must_use]
    pub fn format_stats(&self) -> CacheStats {
        self.formats.stats()
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("templates", &self.cache.len())
            .field("widths", &self.widths.len())
            .field("formats", &self.formats.len())
            .finish()
    }
}

/// Free-function form of [`LayoutEngine::allocate`].
pub fn allocate(
    records: &[RecordRef],
    fields: &[Field],
    container: &Container,
    show_headers: bool,
    contain: bool,
    engine: &mut LayoutEngine,
) -> Result<Arc<WidthTemplate>, LayoutError> {
    engine.allocate(records, fields, container, show_headers, contain)
}

fn digest(
    records: &[RecordRef],
    fields: &[Field],
    container: &Container,
    show_headers: bool,
    contain: bool,
) -> u64 {
    let mut ids: Vec<&str> = records.iter().map(|r| r.id().as_str()).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut hasher = FxHasher::default();
    ids.hash(&mut hasher);
    show_headers.hash(&mut hasher);
    contain.hash(&mut hasher);
    container.width_px.to_bits().hash(&mut hasher);
    container.font.hash(&mut hasher);
    for field in fields {
        field.id().hash(&mut hasher);
        field.header().hash(&mut hasher);
        field.overflow().hash(&mut hasher);
    }
    hasher.finish()
}

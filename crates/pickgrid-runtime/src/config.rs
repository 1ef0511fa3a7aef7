#![forbid(unsafe_code)]

use pickgrid_text::FontSpec;

/// Picker behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Options shown at once; longer lists end in a refine-filter row.
    pub max_options: usize,
    /// Non-empty queries shorter than this are ignored.
    pub min_characters: usize,
    /// The host re-sources records from the query.
    pub managed_search: bool,
    /// Measure column headers when allocating the option list.
    pub show_headers: bool,
    /// Container width used when the host gives none.
    pub default_width_px: f64,
    pub font: FontSpec,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_options: 50,
            min_characters: 1,
            managed_search: false,
            show_headers: true,
            default_width_px: 600.0,
            font: FontSpec::default(),
        }
    }
}

impl PickerConfig {
    #[must_use]
    pub fn with_max_options(mut self, max_options: usize) -> Self {
        self.max_options = max_options;
        self
    }

    #[must_use]
    pub fn with_min_characters(mut self, min_characters: usize) -> Self {
        self.min_characters = min_characters;
        self
    }

    #[must_use]
    pub fn with_managed_search(mut self, managed: bool) -> Self {
        self.managed_search = managed;
        self
    }

    #[must_use]
    pub fn with_show_headers(mut self, show: bool) -> Self {
        self.show_headers = show;
        self
    }

    #[must_use]
    pub fn with_default_width(mut self, px: f64) -> Self {
        self.default_width_px = px;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }
}

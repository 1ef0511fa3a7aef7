#![forbid(unsafe_code)]

use pickgrid_text::DEFAULT_CACHE_CAPACITY;

/// Layout tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal padding added to every non-empty cell.
    /// Default: 18.0
    pub cell_padding_px: f64,

    /// Gap reserved per column. Subtracted from the budget in contain mode,
    /// added to each natural width otherwise.
    /// Default: 10.0
    pub column_margin_px: f64,

    /// Maximum cached templates.
    /// Default: 512
    pub template_capacity: usize,

    /// Maximum cached container budgets.
    /// Default: 256
    pub budget_capacity: usize,

    /// Maximum cached text widths.
    /// Default: 4096
    pub width_capacity: usize,

    /// Maximum cached formatted cells.
    /// Default: 4096
    pub format_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_padding_px: 18.0,
            column_margin_px: 10.0,
            template_capacity: 512,
            budget_capacity: 256,
            width_capacity: DEFAULT_CACHE_CAPACITY,
            format_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn with_cell_padding(mut self, px: f64) -> Self {
        self.cell_padding_px = px.max(0.0);
        self
    }

    #[must_use]
    pub fn with_column_margin(mut self, px: f64) -> Self {
        self.column_margin_px = px.max(0.0);
        self
    }

    #[must_use]
    pub fn with_template_capacity(mut self, capacity: usize) -> Self {
        self.template_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_budget_capacity(mut self, capacity: usize) -> Self {
        self.budget_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_width_capacity(mut self, capacity: usize) -> Self {
        self.width_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_format_capacity(mut self, capacity: usize) -> Self {
        self.format_capacity = capacity;
        self
    }
}

#![forbid(unsafe_code)]

/// Whole-pixel width per field, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct WidthTemplate {
    widths: Vec<u32>,
}

impl WidthTemplate {
    #[must_use]
    pub fn new(widths: Vec<u32>) -> Self {
        Self { widths }
    }

    /// A template of `len` hidden columns.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            widths: vec![0; len],
        }
    }

    #[must_use]
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.widths.get(index).copied()
    }

    /// A zero-width column is not rendered.
    #[must_use]
    pub fn is_hidden(&self, index: usize) -> bool {
        self.get(index).is_none_or(|w| w == 0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.widths.iter().map(|&w| u64::from(w)).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Grid-template style track list, e.g. `["40px", "0px"]`.
    #[must_use]
    pub fn to_css(&self) -> Vec<String> {
        self.widths.iter().map(|w| format!("{w}px")).collect()
    }
}

impl From<Vec<u32>> for WidthTemplate {
    fn from(widths: Vec<u32>) -> Self {
        Self::new(widths)
    }
}

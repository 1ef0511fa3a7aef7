#![forbid(unsafe_code)]

use pickgrid_layout::{LayoutConfig, LayoutEngine};
use pickgrid_search::{KeywordIndex, Searcher};
use pickgrid_text::{MonospaceMeasurer, TextMeasurer};

/// Caches shared by every picker on a page.
///
/// Passed by `&mut` into each picker event; nothing here is global.
#[derive(Debug)]
pub struct Engine {
    pub layout: LayoutEngine,
    pub keywords: KeywordIndex,
    pub searcher: Searcher,
}

impl Engine {
    #[must_use]
    pub fn new(config: LayoutConfig, measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            layout: LayoutEngine::new(config, measurer),
            keywords: KeywordIndex::default(),
            searcher: Searcher::default(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), MonospaceMeasurer::default())
    }
}

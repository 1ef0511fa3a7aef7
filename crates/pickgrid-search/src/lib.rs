#![forbid(unsafe_code)]

//! Query parsing, keyword matching and ranking for record pickers.
//!
//! A query is split into tokens ([`parse_query`]). A candidate survives
//! when it is enabled and every token matches at least one of its
//! [`Keyword`]s. Survivors are ordered by how strongly, and in which
//! priority field, each token matches the candidate's raw values.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pickgrid_core::{Record, RecordRef};
//! use pickgrid_search::{Keyword, KeywordKind, SearchProfile, Searchable, search};
//!
//! struct Row {
//!     record: RecordRef,
//!     keywords: Vec<Keyword>,
//! }
//!
//! impl Searchable for Row {
//!     fn keywords(&self) -> &[Keyword] {
//!         &self.keywords
//!     }
//!     fn record(&self) -> Option<&pickgrid_core::Record> {
//!         Some(&self.record)
//!     }
//! }
//!
//! let row = |id: &str, ticker: &str| Row {
//!     record: Arc::new(Record::new(id).with("defaultSecurityId", ticker)),
//!     keywords: vec![Keyword::new(ticker, KeywordKind::Text)],
//! };
//! let hits = search("aapl", vec![row("1", "AAPLX"), row("2", "MSFT"), row("3", "AAPL")], &SearchProfile::securities());
//! let ids: Vec<&str> = hits.iter().map(|r| r.record.id().as_str()).collect();
//! assert_eq!(ids, ["3", "1"]);
//! ```

use pickgrid_core::Record;

pub mod date;
pub mod keyword;
pub mod matcher;
pub mod query;
pub mod rank;
pub mod terms;

pub use date::{DateParts, date_matches, normalize_date};
pub use keyword::{Applicability, DEFAULT_INDEX_CAPACITY, Keyword, KeywordIndex, SearchField, SearchProfile};
pub use matcher::{KeywordKind, MatchMode};
pub use query::{Tokens, parse_query};
pub use rank::{DEFAULT_MEMO_CAPACITY, RankWeights, Searcher, best_index};

/// Anything the search engine can filter and rank.
pub trait Searchable {
    /// Pre-computed keywords used for filtering.
    fn keywords(&self) -> &[Keyword];

    /// The record whose raw values are used for ranking, if any.
    fn record(&self) -> Option<&Record>;

    /// Disabled candidates never survive a non-blank query.
    fn is_disabled(&self) -> bool {
        false
    }
}

/// Filter and rank with a throwaway [`Searcher`].
pub fn search<T: Searchable>(query: &str, candidates: Vec<T>, profile: &SearchProfile) -> Vec<T> {
    Searcher::default().search(query, candidates, profile)
}

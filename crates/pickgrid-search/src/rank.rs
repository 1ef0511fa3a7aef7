#![forbid(unsafe_code)]

//! Filtering and ranking.
//!
//! For each token and each match strength (exact, starts-with, contains)
//! the ranker finds the first rank field, in priority order, whose raw
//! value matches. That position earns `(index + 1) * weight` points, or the
//! no-match sentinel when no field matches. Points are summed over tokens
//! and strengths; fewer points rank higher.
//!
//! # Invariants
//!
//! - Only candidates that are enabled and whose keywords cover every token
//!   are returned.
//! - Sorting is stable: equal scores keep their input order.
//! - The memo key covers the token, the strength and every rank field's
//!   name, kind and raw value, so a memoized index is never stale.

use std::hash::{Hash, Hasher};

use lru::LruCache;
use pickgrid_core::Record;
use pickgrid_text::{CacheStats, capacity_of};
use rustc_hash::FxHasher;
use tracing::debug;

use crate::Searchable;
use crate::keyword::{SearchField, SearchProfile};
use crate::matcher::MatchMode;
use crate::query::parse_query;

/// Point weights per match strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWeights {
    pub exact: u64,
    pub starts_with: u64,
    pub contains: u64,
    /// Points for a strength at which no rank field matched.
    pub no_match: u64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            exact: 1,
            starts_with: 5,
            contains: 10,
            no_match: 1000,
        }
    }
}

impl RankWeights {
    #[must_use]
    pub fn weight(&self, mode: MatchMode) -> u64 {
        match mode {
            MatchMode::Exact => self.exact,
            MatchMode::StartsWith => self.starts_with,
            MatchMode::Contains => self.contains,
        }
    }

    /// Points for a match at `index` (or none) under `mode`.
    #[must_use]
    pub fn points(&self, index: Option<usize>, mode: MatchMode) -> u64 {
        index.map_or(self.no_match, |i| (i as u64 + 1) * self.weight(mode))
    }
}

/// Position of the first rank field whose raw value matches `term`.
#[must_use]
pub fn best_index(record: &Record, term: &str, mode: MatchMode, fields: &[SearchField]) -> Option<usize> {
    fields.iter().position(|f| f.matches_record(record, term, mode))
}

/// Default number of memoized (record values, token, strength) lookups.
pub const DEFAULT_MEMO_CAPACITY: usize = 8192;

/// Stateful search front end with a memo of rank lookups.
#[derive(Debug)]
pub struct Searcher {
    weights: RankWeights,
    memo: LruCache<u64, Option<usize>>,
    hits: u64,
    misses: u64,
}

impl Searcher {
    #[must_use]
    pub fn new(weights: RankWeights, capacity: usize) -> Self {
        Self {
            weights,
            memo: LruCache::new(capacity_of(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn weights(&self) -> RankWeights {
        self.weights
    }

    /// Filter and rank `candidates` against `query`.
    ///
    /// A blank query returns the candidates untouched.
    pub fn search<T: Searchable>(&mut self, query: &str, candidates: Vec<T>, profile: &SearchProfile) -> Vec<T> {
        if query.trim().is_empty() {
            return candidates;
        }
        let tokens = parse_query(query);
        let total = candidates.len();

        let mut scored: Vec<(bool, u64, T)> = candidates
            .into_iter()
            .filter(|c| {
                !c.is_disabled()
                    && tokens.iter().all(|t| c.keywords().iter().any(|k| k.matches(t, MatchMode::Contains)))
            })
            .map(|c| {
                let score = match c.record() {
                    Some(record) => self.score(record, &tokens, profile),
                    None => self.weights.no_match * (tokens.len() * MatchMode::ALL.len()) as u64,
                };
                (c.is_disabled(), score, c)
            })
            .collect();
        scored.sort_by_key(|(disabled, score, _)| (*disabled, *score));

        debug!(query, tokens = tokens.len(), total, retained = scored.len(), "search");
        scored.into_iter().map(|(_, _, c)| c).collect()
    }

    /// Total points for `record` over `tokens`.
    pub fn score(&mut self, record: &Record, tokens: &[String], profile: &SearchProfile) -> u64 {
        let mut total = 0;
        for token in tokens {
            for mode in MatchMode::ALL {
                let index = self.best_index(record, token, mode, profile.rank_fields());
                total += self.weights.points(index, mode);
            }
        }
        total
    }

    fn best_index(&mut self, record: &Record, term: &str, mode: MatchMode, fields: &[SearchField]) -> Option<usize> {
        let key = memo_key(record, term, mode, fields);
        if let Some(index) = self.memo.get(&key) {
            self.hits += 1;
            return *index;
        }
        self.misses += 1;
        let index = best_index(record, term, mode, fields);
        self.memo.put(key, index);
        index
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.memo.len(),
            capacity: self.memo.cap().get(),
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(RankWeights::default(), DEFAULT_MEMO_CAPACITY)
    }
}

fn memo_key(record: &Record, term: &str, mode: MatchMode, fields: &[SearchField]) -> u64 {
    let mut hasher = FxHasher::default();
    term.hash(&mut hasher);
    mode.hash(&mut hasher);
    for field in fields {
        field.hash(&mut hasher);
        record.get(&field.name).hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SearchProfile {
        SearchProfile::securities()
    }

    #[test]
    fn points_by_position_and_strength() {
        let w = RankWeights::default();
        assert_eq!(w.points(Some(0), MatchMode::Exact), 1);
        assert_eq!(w.points(Some(2), MatchMode::StartsWith), 15);
        assert_eq!(w.points(Some(3), MatchMode::Contains), 40);
        assert_eq!(w.points(None, MatchMode::Exact), 1000);
    }

    #[test]
    fn exact_identifier_scores_lowest() {
        let exact = Record::new("A").with("defaultSecurityId", "AAPL");
        let prefix = Record::new("B").with("defaultSecurityId", "AAPLX");
        let mut searcher = Searcher::default();
        let tokens = vec!["aapl".to_owned()];
        // exact@0 + starts@0 + contains@0
        assert_eq!(searcher.score(&exact, &tokens, &profile()), 1 + 5 + 10);
        // no exact + starts@0 + contains@0
        assert_eq!(searcher.score(&prefix, &tokens, &profile()), 1000 + 5 + 10);
    }

    #[test]
    fn memo_hits_on_repeat() {
        let record = Record::new("A").with("name", "Apple");
        let mut searcher = Searcher::default();
        let tokens = vec!["app".to_owned()];
        let first = searcher.score(&record, &tokens, &profile());
        let second = searcher.score(&record, &tokens, &profile());
        assert_eq!(first, second);
        assert_eq!(searcher.stats().misses, 3);
        assert_eq!(searcher.stats().hits, 3);
    }

    #[test]
    fn memo_sees_value_changes() {
        let mut searcher = Searcher::default();
        let tokens = vec!["apple".to_owned()];
        let before = searcher.score(&Record::new("A").with("name", "Apple"), &tokens, &profile());
        let after = searcher.score(&Record::new("A").with("name", "Pear"), &tokens, &profile());
        assert!(after > before);
    }
}

#![forbid(unsafe_code)]

//! Searchable keywords and the profiles that produce them.
//!
//! A [`SearchProfile`] names which record properties contribute keywords
//! (for filtering) and which, in priority order, contribute to ranking.
//! [`KeywordIndex`] builds each record's keyword list once and keeps it
//! until the record's searchable values change.
//!
//! # Invariants
//!
//! - Keyword text is the column's formatted display text when the profile
//!   field names a known column, otherwise the raw value's display text.
//! - Keyword text is stored lower-cased and trimmed; empty keywords are
//!   dropped.
//! - An index entry is reused only while the fingerprint of the record's
//!   keyword-field values is unchanged.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lru::LruCache;
use pickgrid_core::{Field, FormatError, Record, RecordId};
use pickgrid_text::{CacheStats, FormatCache, capacity_of};
use rustc_hash::FxHasher;
use tracing::trace;

use crate::matcher::{KeywordKind, MatchMode};
use crate::terms::{
    is_definitely_date, is_definitely_float, is_likely_date, is_likely_float, is_text_term,
};

/// Which query terms a keyword competes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Applicability {
    /// Every term.
    Any,
    /// Terms that are neither definitely dates nor definitely floats.
    #[default]
    TextTerms,
    /// Terms made only of digits and `. $ - ( )`.
    FloatTerms,
    /// Terms made only of digits and `- ( ) /`.
    DateTerms,
}

impl Applicability {
    /// The natural applicability of a keyword kind.
    #[must_use]
    pub const fn for_kind(kind: KeywordKind) -> Self {
        match kind {
            KeywordKind::Text => Self::TextTerms,
            KeywordKind::Float => Self::FloatTerms,
            KeywordKind::Date => Self::DateTerms,
        }
    }

    #[must_use]
    pub fn accepts(self, term: &str) -> bool {
        match self {
            Self::Any => true,
            Self::TextTerms => is_text_term(term),
            Self::FloatTerms => is_likely_float(term) || is_definitely_float(term),
            Self::DateTerms => is_likely_date(term) || is_definitely_date(term),
        }
    }
}

/// One searchable string derived from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    text: Arc<str>,
    kind: KeywordKind,
    applies: Applicability,
}

impl Keyword {
    /// A keyword of `kind` with its natural applicability.
    #[must_use]
    pub fn new(text: &str, kind: KeywordKind) -> Self {
        Self::with_applicability(text, kind, Applicability::for_kind(kind))
    }

    #[must_use]
    pub fn with_applicability(text: &str, kind: KeywordKind, applies: Applicability) -> Self {
        Self {
            text: Arc::from(text.trim().to_lowercase()),
            kind,
            applies,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> KeywordKind {
        self.kind
    }

    #[must_use]
    pub fn applies(&self) -> Applicability {
        self.applies
    }

    /// Does this keyword match a (lower-cased) query term?
    #[must_use]
    pub fn matches(&self, term: &str, mode: MatchMode) -> bool {
        self.applies.accepts(term) && self.kind.matches(term, &self.text, mode)
    }
}

/// A record property that participates in search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchField {
    pub name: String,
    pub kind: KeywordKind,
    pub applies: Applicability,
}

impl SearchField {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: KeywordKind) -> Self {
        Self {
            name: name.into(),
            kind,
            applies: Applicability::for_kind(kind),
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, KeywordKind::Text)
    }

    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, KeywordKind::Float)
    }

    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, KeywordKind::Date)
    }

    #[must_use]
    pub fn with_applicability(mut self, applies: Applicability) -> Self {
        self.applies = applies;
        self
    }

    /// Does the raw `record` value for this field match `term`?
    ///
    /// Absent and falsy values never match.
    #[must_use]
    pub fn matches_record(&self, record: &Record, term: &str, mode: MatchMode) -> bool {
        let Some(value) = record.get(&self.name).filter(|v| v.is_truthy()) else {
            return false;
        };
        if !self.applies.accepts(term) {
            return false;
        }
        let candidate = value.to_string().to_lowercase();
        self.kind.matches(term, candidate.trim(), mode)
    }
}

/// Which fields are searched and how they rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchProfile {
    keyword_fields: Vec<SearchField>,
    rank_fields: Vec<SearchField>,
}

impl SearchProfile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword (filtering) field.
    #[must_use]
    pub fn keyword(mut self, field: SearchField) -> Self {
        self.keyword_fields.push(field);
        self
    }

    /// Append a rank field; earlier fields outrank later ones.
    #[must_use]
    pub fn rank(mut self, field: SearchField) -> Self {
        self.rank_fields.push(field);
        self
    }

    /// Every column searched and ranked as text, in column order.
    #[must_use]
    pub fn for_fields(fields: &[Field]) -> Self {
        let searchable: Vec<SearchField> = fields.iter().map(|f| SearchField::text(f.id())).collect();
        Self {
            keyword_fields: searchable.clone(),
            rank_fields: searchable,
        }
    }

    /// The bond/security picker profile: identifiers and names as text,
    /// coupon as a float, maturity as a date.
    #[must_use]
    pub fn securities() -> Self {
        Self::new()
            .keyword(SearchField::text("defaultSecurityId"))
            .keyword(SearchField::text("securityIdentifiers"))
            .keyword(SearchField::text("childSecurityIdentifiers"))
            .keyword(SearchField::text("name"))
            .keyword(SearchField::text("issuerCode"))
            .keyword(SearchField::text("issuerName"))
            .keyword(SearchField::float("coupon"))
            .keyword(SearchField::date("maturityDate"))
            .keyword(SearchField::text("moodyRating"))
            .keyword(SearchField::text("currencyCode"))
            .rank(SearchField::text("defaultSecurityId"))
            .rank(SearchField::text("securityIdentifiers"))
            .rank(SearchField::text("childSecurityIdentifiers"))
            .rank(SearchField::text("name"))
            .rank(SearchField::text("issuerCode"))
            .rank(SearchField::float("coupon"))
            .rank(SearchField::date("maturityDate"))
    }

    #[must_use]
    pub fn keyword_fields(&self) -> &[SearchField] {
        &self.keyword_fields
    }

    #[must_use]
    pub fn rank_fields(&self) -> &[SearchField] {
        &self.rank_fields
    }
}

/// Default number of records whose keywords are retained.
pub const DEFAULT_INDEX_CAPACITY: usize = 4096;

/// Per-record keyword cache.
#[derive(Debug)]
pub struct KeywordIndex {
    cache: LruCache<RecordId, (u64, Arc<[Keyword]>)>,
    hits: u64,
    misses: u64,
}

impl KeywordIndex {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity_of(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    /// Keywords for `record` under `profile`.
    ///
    /// Formatting goes through `formats`, so a failing column formatter
    /// fails the whole keyword list and nothing is cached.
    pub fn keywords(
        &mut self,
        record: &Record,
        fields: &[Field],
        profile: &SearchProfile,
        formats: &mut FormatCache,
    ) -> Result<Arc<[Keyword]>, FormatError> {
        let print = fingerprint(record, profile);
        let cached = self
            .cache
            .get(record.id())
            .filter(|(seen, _)| *seen == print)
            .map(|(_, keywords)| Arc::clone(keywords));
        if let Some(keywords) = cached {
            self.hits += 1;
            return Ok(keywords);
        }

        self.misses += 1;
        let mut keywords = Vec::with_capacity(profile.keyword_fields.len());
        for search_field in &profile.keyword_fields {
            let text = match fields.iter().find(|f| f.id() == search_field.name) {
                Some(field) => formats.format(field, record)?.to_string(),
                None => record
                    .get(&search_field.name)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            };
            let keyword = Keyword::with_applicability(&text, search_field.kind, search_field.applies);
            if !keyword.text.is_empty() {
                keywords.push(keyword);
            }
        }
        let keywords: Arc<[Keyword]> = keywords.into();
        trace!(record = %record.id(), count = keywords.len(), "keywords built");
        self.cache.put(record.id().clone(), (print, Arc::clone(&keywords)));
        Ok(keywords)
    }

    /// Drop the cached keywords of one record.
    pub fn forget(&mut self, id: &RecordId) {
        self.cache.pop(id);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_CAPACITY)
    }
}

fn fingerprint(record: &Record, profile: &SearchProfile) -> u64 {
    let mut hasher = FxHasher::default();
    for field in &profile.keyword_fields {
        field.hash(&mut hasher);
        record.get(&field.name).hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickgrid_core::{Formatted, Value};

    fn bond() -> Record {
        Record::new("B1")
            .with("defaultSecurityId", "US0378331005")
            .with("name", "Apple Inc 4.5 2030")
            .with("coupon", 4.5)
            .with("maturityDate", "2030-06-01")
            .with("currencyCode", "USD")
    }

    #[test]
    fn applicability_by_kind() {
        assert!(Applicability::TextTerms.accepts("aapl"));
        assert!(!Applicability::TextTerms.accepts("4.5"));
        assert!(Applicability::FloatTerms.accepts("4.25"));
        assert!(!Applicability::FloatTerms.accepts("aapl"));
        assert!(Applicability::DateTerms.accepts("6/1"));
        assert!(!Applicability::DateTerms.accepts("4.5"));
        assert!(Applicability::Any.accepts("anything"));
    }

    #[test]
    fn keyword_is_normalized() {
        let k = Keyword::new("  Apple Inc ", KeywordKind::Text);
        assert_eq!(k.text(), "apple inc");
        assert!(k.matches("apple", MatchMode::StartsWith));
        assert!(!k.matches("4.5", MatchMode::Contains));
    }

    #[test]
    fn raw_values_without_columns() {
        let mut index = KeywordIndex::default();
        let mut formats = FormatCache::default();
        let keywords = index
            .keywords(&bond(), &[], &SearchProfile::securities(), &mut formats)
            .unwrap();
        let texts: Vec<&str> = keywords.iter().map(Keyword::text).collect();
        assert_eq!(
            texts,
            vec!["us0378331005", "apple inc 4.5 2030", "4.5", "2030-06-01", "usd"]
        );
    }

    #[test]
    fn column_formatter_supplies_text() {
        let fields = vec![Field::new("coupon", "Cpn").with_formatter(|v: Option<&Value>, _: &Record| {
            Ok(Formatted::from(format!("{:.3}", v.and_then(Value::as_number).unwrap_or(0.0))))
        })];
        let profile = SearchProfile::new().keyword(SearchField::float("coupon"));
        let mut formats = FormatCache::default();
        let keywords = KeywordIndex::default()
            .keywords(&bond(), &fields, &profile, &mut formats)
            .unwrap();
        assert_eq!(keywords[0].text(), "4.500");
        assert_eq!(keywords[0].kind(), KeywordKind::Float);
    }

    #[test]
    fn cached_until_values_change() {
        let profile = SearchProfile::securities();
        let mut index = KeywordIndex::default();
        let mut formats = FormatCache::default();
        index.keywords(&bond(), &[], &profile, &mut formats).unwrap();
        index.keywords(&bond(), &[], &profile, &mut formats).unwrap();
        assert_eq!(index.stats().hits, 1);

        let renamed = bond().with("name", "Apple Inc 5.0 2031");
        let keywords = index.keywords(&renamed, &[], &profile, &mut formats).unwrap();
        assert!(keywords.iter().any(|k| k.text() == "apple inc 5.0 2031"));
        assert_eq!(index.stats().misses, 2);
        assert_eq!(index.len(), 1);

        index.forget(renamed.id());
        assert!(index.is_empty());
    }

    #[test]
    fn formatter_failure_propagates() {
        let fields = vec![Field::new("name", "Name").with_formatter(|_: Option<&Value>, _: &Record| {
            Err("boom".to_owned())
        })];
        let mut index = KeywordIndex::default();
        let mut formats = FormatCache::default();
        let err = index
            .keywords(&bond(), &fields, &SearchProfile::securities(), &mut formats)
            .unwrap_err();
        assert_eq!(err.field, "name");
        assert!(index.is_empty());
    }

    #[test]
    fn rank_field_ignores_falsy_values() {
        let record = Record::new("Z").with("coupon", 0.0).with("name", "");
        assert!(!SearchField::float("coupon").matches_record(&record, "0", MatchMode::Contains));
        assert!(!SearchField::text("name").matches_record(&record, "", MatchMode::Contains));
        assert!(SearchField::float("coupon").matches_record(&bond(), "4.5", MatchMode::Exact));
    }
}

#![forbid(unsafe_code)]

//! Per-kind term matching.
//!
//! Both sides are expected lower-cased and trimmed; [`crate::Keyword`]
//! normalizes on construction and the ranker normalizes raw values before
//! calling in.

use crate::date::date_matches;

/// How strictly a term must agree with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    Exact,
    StartsWith,
    Contains,
}

impl MatchMode {
    /// Modes in ranking order, strictest first.
    pub const ALL: [Self; 3] = [Self::Exact, Self::StartsWith, Self::Contains];
}

/// What kind of value a keyword or rank field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeywordKind {
    #[default]
    Text,
    Float,
    Date,
}

impl KeywordKind {
    /// Does `term` match `candidate` under `mode`?
    #[must_use]
    pub fn matches(self, term: &str, candidate: &str, mode: MatchMode) -> bool {
        match self {
            Self::Text => text_matches(term, candidate, mode),
            Self::Float => float_matches(term, candidate, mode),
            Self::Date => date_matches(term, candidate, mode),
        }
    }
}

fn text_matches(term: &str, candidate: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => candidate == term,
        MatchMode::StartsWith => candidate.starts_with(term),
        MatchMode::Contains => candidate.contains(term),
    }
}

fn float_matches(term: &str, candidate: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => numeric(term) == numeric(candidate),
        MatchMode::StartsWith => candidate.starts_with(term),
        MatchMode::Contains => candidate.contains(term),
    }
}

/// Lenient numeric reading: blank is zero, anything unparsable is NaN (so
/// never equal to anything).
fn numeric(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_modes() {
        assert!(KeywordKind::Text.matches("aapl", "aapl", MatchMode::Exact));
        assert!(!KeywordKind::Text.matches("aap", "aapl", MatchMode::Exact));
        assert!(KeywordKind::Text.matches("aap", "aapl", MatchMode::StartsWith));
        assert!(KeywordKind::Text.matches("apl", "aapl", MatchMode::Contains));
        assert!(!KeywordKind::Text.matches("apl", "aapl", MatchMode::StartsWith));
    }

    #[test]
    fn float_exact_is_numeric() {
        assert!(KeywordKind::Float.matches("4.5", "4.50", MatchMode::Exact));
        assert!(KeywordKind::Float.matches("4.5", "4.500", MatchMode::Exact));
        assert!(!KeywordKind::Float.matches("4.5", "4.25", MatchMode::Exact));
        assert!(!KeywordKind::Float.matches("$4.5", "4.5", MatchMode::Exact));
        assert!(!KeywordKind::Float.matches("nan", "nan", MatchMode::Exact));
    }

    #[test]
    fn float_partial_is_textual() {
        assert!(KeywordKind::Float.matches("4.", "4.25", MatchMode::StartsWith));
        assert!(KeywordKind::Float.matches(".25", "4.25", MatchMode::Contains));
    }

    #[test]
    fn date_kind_delegates() {
        assert!(KeywordKind::Date.matches("2030", "2030-06-01", MatchMode::Contains));
        assert!(!KeywordKind::Date.matches("june", "2030-06-01", MatchMode::Contains));
    }
}

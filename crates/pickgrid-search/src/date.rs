#![forbid(unsafe_code)]

//! Date matching.
//!
//! Candidates are normalized to `MM/DD/YYYY` from either `YYYY-MM-DD[T..]`
//! or `M/D/YYYY`. Query fragments are split on `/` and `-`.
//!
//! - Exact: all three parts must agree, read as `YYYY-MM-DD` when the first
//!   fragment has four digits and `MM/DD/YYYY` otherwise.
//! - Partial: every fragment of up to three digits must match the year's
//!   prefix or suffix, or the zero-padded day or month; a four-digit
//!   fragment must equal the year.
//!
//! Anything that does not parse is simply not a match.

use crate::matcher::MatchMode;
use crate::terms::is_likely_date;

/// `(month, day, year)`, month and day zero-padded to two digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub month: String,
    pub day: String,
    pub year: String,
}

fn pad2(part: &str) -> String {
    format!("{part:0>2}")
}

fn all_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a candidate date string.
#[must_use]
pub fn normalize_date(candidate: &str) -> Option<DateParts> {
    let date = candidate.split('T').next().unwrap_or_default();
    let parts: Vec<&str> = date.split(['/', '-', '_']).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    if !(all_digits(a) && all_digits(b) && all_digits(c)) {
        return None;
    }
    let short = |p: &str| (1..=2).contains(&p.len());
    if a.len() == 4 && short(b) && short(c) {
        Some(DateParts {
            month: pad2(b),
            day: pad2(c),
            year: (*a).to_owned(),
        })
    } else if c.len() == 4 && short(a) && short(b) {
        Some(DateParts {
            month: pad2(a),
            day: pad2(b),
            year: (*c).to_owned(),
        })
    } else {
        None
    }
}

impl DateParts {
    /// `MM/DD/YYYY`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}/{}/{}", self.month, self.day, self.year)
    }
}

/// Match a query term against a date-valued candidate.
#[must_use]
pub fn date_matches(term: &str, candidate: &str, mode: MatchMode) -> bool {
    if !is_likely_date(term) {
        return false;
    }
    let Some(date) = normalize_date(candidate) else {
        return false;
    };
    let fragments: Vec<&str> = term
        .split(['/', '-'])
        .filter(|p| p.bytes().any(|b| b.is_ascii_digit()))
        .collect();
    if fragments.is_empty() {
        return false;
    }

    match mode {
        MatchMode::Exact => {
            let at = |i: usize| fragments.get(i).copied();
            if fragments[0].len() == 4 {
                fragments[0] == date.year
                    && at(1).map(pad2).as_deref() == Some(date.month.as_str())
                    && at(2).map(pad2).as_deref() == Some(date.day.as_str())
            } else {
                pad2(fragments[0]) == date.month
                    && at(1).map(pad2).as_deref() == Some(date.day.as_str())
                    && at(2) == Some(date.year.as_str())
            }
        }
        MatchMode::StartsWith | MatchMode::Contains => fragments.iter().all(|part| match part.len() {
            0..=3 => {
                date.year.ends_with(part)
                    || date.year.starts_with(part)
                    || date.day == pad2(part)
                    || date.month == pad2(part)
            }
            4 => date.year == *part,
            _ => false,
        }),
    }
}

#![forbid(unsafe_code)]

//! Record comparators used when sorting the option list.
//!
//! Every comparator takes two optional raw values. Absent values are part of
//! the contract: the default comparator puts them first, while the
//! specialised ones ([`compare_iso_dates`], [`ranked_scale`]) put present
//! values first.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{Field, Record, Value};

/// Comparator over two optional raw values.
pub type CompareFn = Arc<dyn Fn(Option<&Value>, Option<&Value>) -> Ordering + Send + Sync>;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

fn text_of(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

fn is_blank(value: Option<&Value>) -> bool {
    !value.is_some_and(Value::is_truthy)
}

/// The fallback comparator.
///
/// Numbers compare numerically with an absent side first; otherwise absent
/// values sort first and text compares case-insensitively.
#[must_use]
pub fn compare_default(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let numeric = matches!(a, Some(Value::Number(_))) || matches!(b, Some(Value::Number(_)));
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) if numeric => {
            let (x, y) = (to_number(x), to_number(y));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x.to_string().to_lowercase().cmp(&y.to_string().to_lowercase()),
    }
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
    }
}

/// Case-insensitive text comparison treating absent values as empty.
#[must_use]
pub fn compare_text_ci(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    text_of(a).to_lowercase().cmp(&text_of(b).to_lowercase())
}

/// Build a comparator that sorts `preferred` (case-insensitive) ahead of
/// everything else, then the rest alphabetically.
#[must_use]
pub fn preferred_first(preferred: &str) -> CompareFn {
    let preferred = preferred.to_uppercase();
    Arc::new(move |a, b| {
        let (a, b) = (text_of(a).to_uppercase(), text_of(b).to_uppercase());
        match (a == preferred, b == preferred) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.cmp(&b),
        }
    })
}

/// Parse `YYYY-MM-DD[T...]` or `M/D/YYYY` into `(year, month, day)`.
#[must_use]
pub fn parse_date_parts(text: &str) -> Option<(u32, u32, u32)> {
    let date = text.split('T').next().unwrap_or_default();
    let parts: Vec<&str> = date.split(['-', '/', '_']).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let nums: Vec<u32> = parts.iter().filter_map(|p| p.parse().ok()).collect();
    if nums.len() != 3 {
        return None;
    }
    if parts[0].len() == 4 {
        Some((nums[0], nums[1], nums[2]))
    } else if parts[2].len() == 4 {
        Some((nums[2], nums[0], nums[1]))
    } else {
        None
    }
}

/// Chronological comparison of date-like text; present values first.
///
/// Unparsable dates compare equal to anything.
#[must_use]
pub fn compare_iso_dates(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (is_blank(a), is_blank(b)) {
        (true, true) => return Ordering::Equal,
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    let (a, b) = (text_of(a), text_of(b));
    match (parse_date_parts(&a), parse_date_parts(&b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Build a comparator ordering values by their position in `scale`
/// (case-insensitive). Present values sort before absent ones, and values on
/// the scale sort before values off it.
#[must_use]
pub fn ranked_scale(scale: &[&str]) -> CompareFn {
    let scale: Vec<String> = scale.iter().map(|s| s.to_lowercase()).collect();
    Arc::new(move |a, b| {
        match (is_blank(a), is_blank(b)) {
            (true, true) => return Ordering::Equal,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            _ => {}
        }
        let rank = |v: Option<&Value>| {
            let text = text_of(v).to_lowercase();
            scale.iter().position(|s| *s == text)
        };
        match (rank(a), rank(b)) {
            (_, None) => Ordering::Less,
            (None, _) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        }
    })
}

/// Compare two records for the option list.
///
/// With a sort field, that field's comparator decides (reversed for
/// descending). Without one, every field is consulted in column order,
/// ascending, until one distinguishes the records.
#[must_use]
pub fn compare_records(
    a: &Record,
    b: &Record,
    sort_field: Option<&Field>,
    fields: &[Field],
    direction: SortDirection,
) -> Ordering {
    match sort_field {
        Some(field) => match direction {
            SortDirection::Ascending => field.compare(a, b),
            SortDirection::Descending => field.compare(b, a),
        },
        None => fields
            .iter()
            .map(|field| field.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal),
    }
}

#![forbid(unsafe_code)]

//! Scalar record values.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single scalar stored under a field name in a [`crate::Record`].
///
/// Date-like values are carried as [`Value::Text`]; the search engine
/// recognises them by shape rather than by type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Borrow the text payload, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value counts as "present" for ranking purposes.
    ///
    /// Empty text, zero, NaN and `false` are not truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            // f64 Display already prints `5` for 5.0 and `4.25` for 4.25.
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Number(n) => {
                1u8.hash(state);
                n.to_bits().hash(state);
            }
            Self::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_display_like_host_strings() {
        assert_eq!(Value::from(5.0).to_string(), "5");
        assert_eq!(Value::from(4.25).to_string(), "4.25");
        assert_eq!(Value::from(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn truthiness() {
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(Value::from(2.5).is_truthy());
        assert!(!Value::from(false).is_truthy());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from(3.0).as_str(), None);
        assert_eq!(Value::from(3i64).as_number(), Some(3.0));
    }
}

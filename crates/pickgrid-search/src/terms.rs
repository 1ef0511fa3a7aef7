#![forbid(unsafe_code)]

//! Shape tests for query terms.
//!
//! Keywords only compete for terms of a compatible shape: a term that is
//! definitely a date or a float is not matched against text keywords, and
//! date/float keywords ignore terms containing letters.

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_date_separator(b: u8) -> bool {
    matches!(b, b'-' | b'(' | b')' | b'/')
}

/// Digits followed by one or more `separator [digit]` groups, e.g. `12/5`
/// or `2030-`.
#[must_use]
pub fn is_definitely_date(term: &str) -> bool {
    let bytes = term.as_bytes();
    let lead = bytes.iter().take_while(|b| is_digit(**b)).count();
    if lead == 0 {
        return false;
    }
    let mut i = lead;
    let mut groups = 0;
    while i < bytes.len() {
        if !is_date_separator(bytes[i]) {
            return false;
        }
        i += 1;
        if i < bytes.len() && is_digit(bytes[i]) {
            i += 1;
        }
        groups += 1;
    }
    groups > 0
}

/// An optional `$`, `.` or `-`, digits, a dot, and at most one digit, e.g.
/// `4.5` or `$12.`.
#[must_use]
pub fn is_definitely_float(term: &str) -> bool {
    let bytes = term.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'$' | b'.' | b'-')));
    let digits = bytes[i..].iter().take_while(|b| is_digit(**b)).count();
    if digits == 0 {
        return false;
    }
    i += digits;
    if bytes.get(i) != Some(&b'.') {
        return false;
    }
    i += 1;
    if bytes.get(i).is_some_and(|b| is_digit(*b)) {
        i += 1;
    }
    i == bytes.len()
}

/// Only digits and `- ( ) /`.
#[must_use]
pub fn is_likely_date(term: &str) -> bool {
    !term.is_empty() && term.bytes().all(|b| is_digit(b) || is_date_separator(b))
}

/// Only digits and `. $ - ( )`.
#[must_use]
pub fn is_likely_float(term: &str) -> bool {
    !term.is_empty()
        && term
            .bytes()
            .all(|b| is_digit(b) || matches!(b, b'.' | b'$' | b'-' | b'(' | b')'))
}

/// Neither definitely a date nor definitely a float.
#[must_use]
pub fn is_text_term(term: &str) -> bool {
    !is_definitely_date(term) && !is_definitely_float(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definite_dates() {
        assert!(is_definitely_date("12/5"));
        assert!(is_definitely_date("2030-"));
        assert!(is_definitely_date("1/2/3"));
        assert!(!is_definitely_date("2030"));
        assert!(!is_definitely_date("12/25"));
        assert!(!is_definitely_date("/12"));
        assert!(!is_definitely_date("abc"));
    }

    #[test]
    fn definite_floats() {
        assert!(is_definitely_float("4.5"));
        assert!(is_definitely_float("$12."));
        assert!(is_definitely_float("-0.1"));
        assert!(!is_definitely_float("4.25"));
        assert!(!is_definitely_float("45"));
        assert!(!is_definitely_float("."));
    }

    #[test]
    fn likely_shapes() {
        assert!(is_likely_date("01/15/2030"));
        assert!(!is_likely_date("01.15"));
        assert!(is_likely_float("$4.25"));
        assert!(!is_likely_float("4/25"));
        assert!(!is_likely_date(""));
    }

    #[test]
    fn text_terms() {
        assert!(is_text_term("aapl"));
        assert!(is_text_term("2030"));
        assert!(!is_text_term("4.5"));
        assert!(!is_text_term("6/1"));
    }
}

#![forbid(unsafe_code)]

//! Query tokenization.
//!
//! The query is lower-cased, the first `%` becomes a space, and the result
//! is trimmed. Whitespace separates tokens, except inside a pair of
//! matching quotes (`'...'` or `"..."`), whose content is kept verbatim as
//! part of the current token. A quote with no closing partner is an
//! ordinary character. Empty tokens are dropped.

use smallvec::SmallVec;

/// Parsed query tokens, in query order.
pub type Tokens = SmallVec<[String; 4]>;

/// Split `query` into search tokens.
#[must_use]
pub fn parse_query(query: &str) -> Tokens {
    let normalized = query.replacen('%', " ", 1).to_lowercase();
    let chars: Vec<char> = normalized.trim().chars().collect();

    let mut tokens = Tokens::new();
    let mut word = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            if let Some(len) = chars[i + 1..].iter().position(|&x| x == c) {
                word.extend(&chars[i + 1..i + 1 + len]);
                i += len + 2;
                continue;
            }
            word.push(c);
        } else if c.is_whitespace() {
            flush(&mut word, &mut tokens);
        } else {
            word.push(c);
        }
        i += 1;
    }
    flush(&mut word, &mut tokens);
    tokens
}

fn flush(word: &mut String, tokens: &mut Tokens) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(q: &str) -> Vec<String> {
        parse_query(q).into_vec()
    }

    #[test]
    fn whitespace_splits() {
        assert_eq!(parse("  Apple   5.25 "), vec!["apple", "5.25"]);
    }

    #[test]
    fn quoted_run_is_one_token() {
        assert_eq!(parse("\"Kozey - Ja\""), vec!["kozey - ja"]);
        assert_eq!(parse("x 'a b' y"), vec!["x", "a b", "y"]);
    }

    #[test]
    fn mismatched_quote_chars_do_not_pair() {
        assert_eq!(parse("\"a b'"), vec!["\"a", "b'"]);
    }

    #[test]
    fn lone_quote_is_literal() {
        assert_eq!(parse("o'neil"), vec!["o'neil"]);
        assert_eq!(parse("\""), vec!["\""]);
    }

    #[test]
    fn first_percent_becomes_space() {
        assert_eq!(parse("4.5%2030"), vec!["4.5", "2030"]);
        assert_eq!(parse("a%b%c"), vec!["a", "b%c"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("\"\"").is_empty());
    }

    #[test]
    fn quotes_glue_to_neighbours() {
        assert_eq!(parse("ab\"c d\"e"), vec!["abc de"]);
    }
}

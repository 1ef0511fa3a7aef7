#![forbid(unsafe_code)]

//! Formatter output.
//!
//! A formatter may return plain text or a composite [`RichText`] tree (for
//! example a bold ticker followed by a dimmed issuer). Layout only ever
//! needs the flattened text content, which [`Formatted::text`] provides.

use std::borrow::Cow;

/// A composite formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichText {
    /// A leaf text run.
    Text(String),
    /// A run carrying a presentation tag (e.g. `"b"`, `"em"`).
    Tagged { tag: String, children: Vec<RichText> },
    /// An untagged group of runs.
    Group(Vec<RichText>),
}

impl RichText {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn tagged(tag: impl Into<String>, children: Vec<RichText>) -> Self {
        Self::Tagged {
            tag: tag.into(),
            children,
        }
    }

    /// Concatenate every leaf run in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut String) {
        match self {
            Self::Text(s) => out.push_str(s),
            Self::Tagged { children, .. } | Self::Group(children) => {
                for child in children {
                    child.collect_into(out);
                }
            }
        }
    }
}

/// Result of formatting one field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Plain(String),
    Rich(RichText),
}

impl Formatted {
    /// Flattened text content.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Plain(s) => Cow::Borrowed(s),
            Self::Rich(rich) => Cow::Owned(rich.text_content()),
        }
    }
}

impl From<String> for Formatted {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<&str> for Formatted {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_owned())
    }
}

impl From<RichText> for Formatted {
    fn from(value: RichText) -> Self {
        Self::Rich(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rich_flattens_in_order() {
        let rich = RichText::Group(vec![
            RichText::tagged("b", vec![RichText::text("AAPL")]),
            RichText::text(" "),
            RichText::tagged("em", vec![RichText::text("Apple"), RichText::text(" Inc")]),
        ]);
        assert_eq!(Formatted::from(rich).text(), "AAPL Apple Inc");
    }

    #[test]
    fn plain_borrows() {
        let f = Formatted::from("x");
        assert!(matches!(f.text(), Cow::Borrowed("x")));
    }
}

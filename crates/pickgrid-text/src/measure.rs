#![forbid(unsafe_code)]

//! The text-measurement primitive.
//!
//! Hosts with a real font stack implement [`TextMeasurer`] themselves; any
//! `Fn(&str, &FontSpec) -> f64` closure also qualifies. [`MonospaceMeasurer`]
//! approximates a proportional font as `cells * size_px * advance_ratio`,
//! where `cells` is the Unicode display width summed over grapheme clusters.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The font a piece of text is measured under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: Arc<str>,
    pub size_px: u16,
    pub weight: u16,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<Arc<str>>, size_px: u16) -> Self {
        Self {
            family: family.into(),
            size_px,
            weight: 400,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("sans-serif", 13)
    }
}

/// Measures the rendered width of text in pixels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &FontSpec) -> f64,
{
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        self(text, font)
    }
}

/// Display width of `text` in terminal-style cells.
///
/// Each grapheme cluster contributes the width of its widest rendering, so
/// combining marks and ZWJ sequences do not inflate the count.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return text.bytes().filter(|b| !b.is_ascii_control()).count();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(grapheme: &str) -> usize {
    let w = UnicodeWidthStr::width(grapheme);
    // Emoji presentation sequences render at least two cells wide.
    if grapheme.contains('\u{FE0F}') { w.max(2) } else { w }
}

/// Fixed-advance measurer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance per cell as a fraction of the font size.
    pub advance_ratio: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        display_width(text) as f64 * f64::from(font.size_px) * self.advance_ratio
    }
}

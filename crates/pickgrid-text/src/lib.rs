#![forbid(unsafe_code)]

//! Text measurement for pickgrid.
//!
//! This crate provides the two caches the layout engine leans on:
//! - [`FormatCache`] - LRU cache of formatted display text per (record, field, raw value)
//! - [`WidthCache`] - LRU cache of pixel widths per (text, font)
//!
//! plus the pluggable [`TextMeasurer`] primitive and a grapheme-aware
//! [`MonospaceMeasurer`] default.
//!
//! # Example
//! ```
//! use pickgrid_text::{FontSpec, MonospaceMeasurer, TextMeasurer, WidthCache};
//!
//! let font = FontSpec::default();
//! let measurer = MonospaceMeasurer::default();
//! let mut cache = WidthCache::new(1000);
//!
//! let first = cache.get_or_measure("Hello", &font, &measurer);
//! let second = cache.get_or_measure("Hello", &font, &measurer);
//! assert_eq!(first, second);
//! assert_eq!(first, measurer.measure("Hello", &font));
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```

pub mod format_cache;
pub mod measure;
pub mod width_cache;

pub use format_cache::FormatCache;
pub use measure::{FontSpec, MonospaceMeasurer, TextMeasurer, display_width};
pub use width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, WidthCache, capacity_of};

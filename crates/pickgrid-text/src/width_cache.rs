#![forbid(unsafe_code)]

//! LRU width cache for text measurement.
//!
//! Measuring text under a real font is the hot path of layout: every
//! allocation measures every formatted cell of every record. This cache
//! stores measured pixel widths keyed by `(text, font)` so repeated
//! allocations over overlapping record sets stay cheap.
//!
//! # Hash Collisions
//! Keys are 64-bit FxHash digests of `(text, font)` rather than the full
//! strings. Collision probability is ~1 in 2^64.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;
use tracing::trace;

use crate::{FontSpec, TextMeasurer};

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU capacity, clamped to at least one entry.
#[must_use]
pub fn capacity_of(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

/// LRU cache of measured pixel widths.
///
/// Not thread-safe; the engines are single-threaded and own their caches.
#[derive(Debug)]
pub struct WidthCache {
    cache: LruCache<u64, f64>,
    hits: u64,
    misses: u64,
}

impl WidthCache {
    /// Create a new cache with the specified capacity.
    ///
    /// If capacity is zero, defaults to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity_of(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the cached width or measure it with `measurer`.
    #[inline]
    pub fn get_or_measure(&mut self, text: &str, font: &FontSpec, measurer: &dyn TextMeasurer) -> f64 {
        self.get_or_compute_with(text, font, |t, f| measurer.measure(t, f))
    }

    /// Get the cached width or compute it with a custom function.
    pub fn get_or_compute_with<F>(&mut self, text: &str, font: &FontSpec, compute: F) -> f64
    where
        F: FnOnce(&str, &FontSpec) -> f64,
    {
        let key = hash_key(text, font);

        if let Some(&width) = self.cache.get(&key) {
            self.hits += 1;
            return width;
        }

        self.misses += 1;
        let width = compute(text, font).max(0.0);
        trace!(text_len = text.len(), width, "width cache miss");
        self.cache.put(key, width);
        width
    }

    /// Peek at the cached width without updating LRU order.
    #[must_use]
    pub fn peek(&self, text: &str, font: &FontSpec) -> Option<f64> {
        self.cache.peek(&hash_key(text, font)).copied()
    }

    #[must_use]
    pub fn contains(&self, text: &str, font: &FontSpec) -> bool {
        self.cache.contains(&hash_key(text, font))
    }

    /// Clear the cache.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Get cache statistics.
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

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[inline]
fn hash_key(text: &str, font: &FontSpec) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    font.hash(&mut hasher);
    hasher.finish()
}

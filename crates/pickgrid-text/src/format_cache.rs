#![forbid(unsafe_code)]

//! Cache of formatted display text.
//!
//! Formatting a cell can be arbitrarily expensive (rich formatters build a
//! small tree just to be flattened again), and the same (record, field)
//! pair is formatted by layout, by option compilation and by keyword
//! extraction. [`FormatCache`] memoizes the flattened text.
//!
//! # Invariants
//!
//! - The key is `(record id, field id, raw value)`. A record whose value
//!   changes under the same id gets a fresh entry.
//! - The cache is written only after the formatter succeeds. A failing
//!   formatter leaves no trace, so a later retry runs it again.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Formatter returns `Err` | Error propagates, nothing cached |
//! | Value absent, no formatter | Empty string (cached) |

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lru::LruCache;
use pickgrid_core::{Field, FormatError, Record};
use rustc_hash::FxHasher;
use tracing::{trace, warn};

use crate::width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, capacity_of};

/// LRU cache of formatted, flattened cell text.
#[derive(Debug)]
pub struct FormatCache {
    cache: LruCache<u64, Arc<str>>,
    hits: u64,
    misses: u64,
}

impl FormatCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity_of(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    /// Formatted display text for `field` of `record`.
    pub fn format(&mut self, field: &Field, record: &Record) -> Result<Arc<str>, FormatError> {
        let key = hash_key(field, record);
        if let Some(text) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(text));
        }

        self.misses += 1;
        let formatted = field.format(record).inspect_err(|err| {
            warn!(field = %err.field, record = %err.record, error = %err.message, "formatter failed");
        })?;
        let text: Arc<str> = Arc::from(formatted.text().as_ref());
        trace!(field = field.id(), record = %record.id(), "format cache miss");
        self.cache.put(key, Arc::clone(&text));
        Ok(text)
    }

    #[must_use]
    pub fn contains(&self, field: &Field, record: &Record) -> bool {
        self.cache.contains(&hash_key(field, record))
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

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

impl Default for FormatCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

fn hash_key(field: &Field, record: &Record) -> u64 {
    let mut hasher = FxHasher::default();
    record.id().hash(&mut hasher);
    field.id().hash(&mut hasher);
    field.raw(record).hash(&mut hasher);
    hasher.finish()
}

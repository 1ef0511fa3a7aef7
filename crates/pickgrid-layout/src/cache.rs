#![forbid(unsafe_code)]

//! Template and budget caches.
//!
//! Templates are keyed by container id plus a digest of everything that
//! shapes the result (sorted record ids, field list, flags, container width).
//! Budgets are resolved once per `(container id, contain)` pair and reused
//! while the container width and column count are unchanged.
//!
//! Both maps are bounded LRU caches. [`LayoutCache::forget_container`] drops
//! everything known about one container.

use std::sync::Arc;

use lru::LruCache;
use pickgrid_text::{CacheStats, capacity_of};
use tracing::trace;

use crate::WidthTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TemplateKey {
    pub(crate) container: Arc<str>,
    pub(crate) digest: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BudgetKey {
    container: Arc<str>,
    contain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BudgetEntry {
    width_bits: u64,
    columns: usize,
    budget: f64,
}

/// Bounded cache of allocated templates and resolved budgets.
#[derive(Debug)]
pub struct LayoutCache {
    templates: LruCache<TemplateKey, Arc<WidthTemplate>>,
    budgets: LruCache<BudgetKey, BudgetEntry>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    #[must_use]
    pub fn new(template_capacity: usize, budget_capacity: usize) -> Self {
        Self {
            templates: LruCache::new(capacity_of(template_capacity)),
            budgets: LruCache::new(capacity_of(budget_capacity)),
            hits: 0,
            misses: 0,
        }
    }

    pub(crate) fn template(&mut self, key: &TemplateKey) -> Option<Arc<WidthTemplate>> {
        match self.templates.get(key) {
            Some(template) => {
                self.hits += 1;
                Some(Arc::clone(template))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn store(&mut self, key: TemplateKey, template: Arc<WidthTemplate>) {
        self.templates.put(key, template);
    }

    /// Usable width for `container` under `contain`, resolving and caching
    /// it with `resolve` on first use.
    pub(crate) fn budget<F>(
        &mut self,
        container: &Arc<str>,
        contain: bool,
        width_px: f64,
        columns: usize,
        resolve: F,
    ) -> f64
    where
        F: FnOnce() -> f64,
    {
        let key = BudgetKey {
            container: Arc::clone(container),
            contain,
        };
        let width_bits = width_px.to_bits();
        let cached = self
            .budgets
            .get(&key)
            .filter(|entry| entry.width_bits == width_bits && entry.columns == columns)
            .map(|entry| entry.budget);
        if let Some(budget) = cached {
            return budget;
        }
        let budget = resolve();
        trace!(container = %container, contain, budget, "budget resolved");
        self.budgets.put(
            key,
            BudgetEntry {
                width_bits,
                columns,
                budget,
            },
        );
        budget
    }

    /// Drop every template and budget recorded for `container`.
    pub fn forget_container(&mut self, container: &str) {
        let stale: Vec<TemplateKey> = self
            .templates
            .iter()
            .filter(|(k, _)| &*k.container == container)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            self.templates.pop(key);
        }
        for contain in [false, true] {
            self.budgets.pop(&BudgetKey {
                container: Arc::from(container),
                contain,
            });
        }
        trace!(container, dropped = stale.len(), "container forgotten");
    }

    pub fn clear(&mut self) {
        self.templates.clear();
        self.budgets.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.templates.len(),
            capacity: self.templates.cap().get(),
        }
    }
}

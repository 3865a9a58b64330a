//! Per-process result caching for search queries.
//!
//! Search providers are the most aggressively rate-limited adapters, so
//! repeated identical queries within a process are served from memory
//! instead of re-fetching. The cache is mutex-guarded (adapters are shared
//! across concurrent sessions) and evicts its oldest entry at capacity.

use crate::Snippet;
use std::collections::HashMap;
use std::sync::Mutex;

/// Default cache capacity.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

#[derive(Debug, Clone)]
struct CacheEntry {
    snippets: Vec<Snippet>,
    inserted_at: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Monotonic insertion counter used for oldest-first eviction.
    seq: u64,
    hits: u64,
    misses: u64,
}

/// Query → snippets cache.
#[derive(Debug)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
}

impl QueryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_entries,
        }
    }

    /// Look up cached snippets for a query.
    pub fn get(&self, query: &str) -> Option<Vec<Snippet>> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = inner.entries.get(query) {
            let snippets = entry.snippets.clone();
            inner.hits += 1;
            Some(snippets)
        } else {
            inner.misses += 1;
            None
        }
    }

    /// Store snippets for a query, evicting the oldest entry at capacity.
    pub fn put(&self, query: &str, snippets: Vec<Snippet>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.len() >= self.max_entries
            && !inner.entries.contains_key(query)
            && let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
        {
            inner.entries.remove(&oldest);
        }
        inner.seq += 1;
        let entry = CacheEntry {
            snippets,
            inserted_at: inner.seq,
        };
        inner.entries.insert(query.to_string(), entry);
    }

    /// Cache hit count (diagnostics).
    pub fn hits(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).hits
    }

    /// Cache miss count (diagnostics).
    pub fn misses(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).misses
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_put_hits() {
        let cache = QueryCache::default();
        assert!(cache.get("rust").is_none());
        cache.put("rust", vec![Snippet::new("a systems language")]);

        let hit = cache.get("rust").unwrap();
        assert_eq!(hit[0].text, "a systems language");
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let cache = QueryCache::new(2);
        cache.put("first", vec![]);
        cache.put("second", vec![]);
        cache.put("third", vec![]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert!(cache.get("third").is_some());
    }

    #[test]
    fn reinsert_does_not_evict() {
        let cache = QueryCache::new(2);
        cache.put("a", vec![]);
        cache.put("b", vec![]);
        cache.put("a", vec![Snippet::new("updated")]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap()[0].text, "updated");
        assert!(cache.get("b").is_some());
    }
}

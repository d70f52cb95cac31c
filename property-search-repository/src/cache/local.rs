//! In-process result page cache with LRU eviction and TTL expiration.
//!
//! First level of the two-level cache: bounded entry count with LRU
//! eviction, and a per-entry time-to-live checked on access.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;

use property_search_shared::CachedPage;

/// Cache entry with its insertion timestamp for TTL expiration.
struct CacheEntry {
    page: CachedPage,
    inserted_at: Instant,
    ttl: Duration,
}

/// LRU cache for search result pages.
pub(crate) struct LocalCache {
    inner: RwLock<LruCache<String, CacheEntry>>,
}

impl LocalCache {
    /// Create a cache holding at most `max_entries` pages.
    pub(crate) fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).expect("max_entries must be positive");
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Get a page if present and not expired. Expired entries are removed
    /// on access.
    pub(crate) fn get(&self, key: &str) -> Option<CachedPage> {
        let mut cache = self.inner.write().ok()?;

        if let Some(entry) = cache.get(key) {
            if entry.inserted_at.elapsed() < entry.ttl {
                return Some(entry.page.clone());
            }
            cache.pop(key);
        }

        None
    }

    /// Insert a page. Evicts the least recently used entry at capacity.
    pub(crate) fn set(&self, key: &str, page: CachedPage, ttl: Duration) {
        if let Ok(mut cache) = self.inner.write() {
            cache.put(
                key.to_string(),
                CacheEntry {
                    page,
                    inserted_at: Instant::now(),
                    ttl,
                },
            );
        }
    }

    /// Remove every entry.
    pub(crate) fn clear(&self) {
        if let Ok(mut cache) = self.inner.write() {
            cache.clear();
        }
    }

    /// Current number of entries.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.read().map(|c| c.len()).unwrap_or(0)
    }
}

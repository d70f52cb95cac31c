//! Cache repository trait definition.

use std::time::Duration;

use async_trait::async_trait;

use property_search_shared::CachedPage;

/// Abstracts the two-level query result cache.
///
/// Cache failures must never surface to callers: implementations log
/// backend errors and report a miss instead. All methods are safe under
/// concurrent callers.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Look up a cached page by fingerprint key. Returns `None` on miss
    /// or on any backend failure.
    async fn get(&self, key: &str) -> Option<CachedPage>;

    /// Store a page under the given key, writing through both cache
    /// levels. `ttl` applies to the distributed level (subject to the
    /// implementation's minimum); the local level uses its own bound.
    async fn set(&self, key: &str, page: CachedPage, ttl: Duration);

    /// Evict every cached search page. Called after each index mutation.
    async fn invalidate_all(&self);
}

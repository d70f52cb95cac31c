//! Two-level query result cache.
//!
//! Composes the in-process LRU cache with a shared memcached backend.
//! Lookups try local first, then the distributed level, promoting
//! distributed hits into the local level. Writes go through both levels.
//! Backend failures are logged and reported as misses; they never fail a
//! request.

mod local;
mod memcached;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use property_search_shared::CachedPage;

use crate::errors::CacheError;
use crate::interfaces::CacheRepository;
use local::LocalCache;
use memcached::MemcachedStore;

/// Maximum number of pages held in the local level.
const LOCAL_MAX_ENTRIES: usize = 1000;

/// Fixed TTL for the local level.
const LOCAL_TTL: Duration = Duration::from_secs(5 * 60);

/// Minimum TTL for the distributed level.
const MIN_REMOTE_TTL: Duration = Duration::from_secs(15 * 60);

/// The distributed half of the cache, abstracted for testing.
#[async_trait]
pub(crate) trait RemotePageStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedPage>, CacheError>;
    async fn set(&self, key: &str, page: &CachedPage, ttl: Duration) -> Result<(), CacheError>;
    async fn flush(&self) -> Result<(), CacheError>;
}

#[async_trait]
impl RemotePageStore for MemcachedStore {
    async fn get(&self, key: &str) -> Result<Option<CachedPage>, CacheError> {
        MemcachedStore::get(self, key).await
    }

    async fn set(&self, key: &str, page: &CachedPage, ttl: Duration) -> Result<(), CacheError> {
        MemcachedStore::set(self, key, page, ttl).await
    }

    async fn flush(&self) -> Result<(), CacheError> {
        MemcachedStore::flush(self).await
    }
}

/// Two-level cache of search result pages.
pub struct TieredCache {
    local: LocalCache,
    remote: Box<dyn RemotePageStore>,
}

impl TieredCache {
    /// Connect to the memcached server at `host:port` and build the cache.
    pub fn connect(memcached_host: &str) -> Result<Self, CacheError> {
        let remote = MemcachedStore::connect(memcached_host)?;
        Ok(Self {
            local: LocalCache::new(LOCAL_MAX_ENTRIES),
            remote: Box::new(remote),
        })
    }

    #[cfg(test)]
    fn with_remote(remote: Box<dyn RemotePageStore>) -> Self {
        Self {
            local: LocalCache::new(LOCAL_MAX_ENTRIES),
            remote,
        }
    }
}

#[async_trait]
impl CacheRepository for TieredCache {
    async fn get(&self, key: &str) -> Option<CachedPage> {
        if let Some(page) = self.local.get(key) {
            debug!(key = %key, "cache hit (local)");
            return Some(page);
        }

        match self.remote.get(key).await {
            Ok(Some(page)) => {
                // Promote to the local level for subsequent lookups.
                self.local.set(key, page.clone(), LOCAL_TTL);
                debug!(key = %key, "cache hit (distributed), promoted to local");
                Some(page)
            }
            Ok(None) => {
                debug!(key = %key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "distributed cache get failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, page: CachedPage, ttl: Duration) {
        self.local.set(key, page.clone(), LOCAL_TTL);

        let remote_ttl = ttl.max(MIN_REMOTE_TTL);
        if let Err(e) = self.remote.set(key, &page, remote_ttl).await {
            warn!(key = %key, error = %e, "distributed cache set failed");
        }
    }

    async fn invalidate_all(&self) {
        self.local.clear();
        if let Err(e) = self.remote.flush().await {
            warn!(error = %e, "distributed cache flush failed");
        }
        debug!("search cache invalidated");
    }
}

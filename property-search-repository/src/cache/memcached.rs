//! Memcached client wrapper.
//!
//! Second level of the two-level cache. The `memcache` client is
//! blocking, so every call runs on the blocking thread pool.

use std::sync::Arc;
use std::time::Duration;

use property_search_shared::CachedPage;

use crate::errors::CacheError;

/// Memcached-backed page store.
pub(crate) struct MemcachedStore {
    client: Arc<memcache::Client>,
}

impl MemcachedStore {
    /// Connect to a memcached server at `host:port`.
    pub(crate) fn connect(host: &str) -> Result<Self, CacheError> {
        let client = memcache::connect(format!("memcache://{host}?timeout=10"))
            .map_err(|e| CacheError::connection(e.to_string()))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Fetch and decode a page. `Ok(None)` is a miss.
    pub(crate) async fn get(&self, key: &str) -> Result<Option<CachedPage>, CacheError> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();

        let bytes: Option<Vec<u8>> =
            tokio::task::spawn_blocking(move || client.get::<Vec<u8>>(&key))
                .await
                .map_err(|e| CacheError::backend(e.to_string()))??;

        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a page with the given TTL.
    pub(crate) async fn set(
        &self,
        key: &str,
        page: &CachedPage,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        let bytes = serde_json::to_vec(page)?;
        let expiration = ttl.as_secs() as u32;

        tokio::task::spawn_blocking(move || client.set(&key, bytes.as_slice(), expiration))
            .await
            .map_err(|e| CacheError::backend(e.to_string()))??;

        Ok(())
    }

    /// Drop every key on the server. The service's namespace holds only
    /// search pages, so a flush is equivalent to prefix eviction.
    pub(crate) async fn flush(&self) -> Result<(), CacheError> {
        let client = Arc::clone(&self.client);

        tokio::task::spawn_blocking(move || client.flush())
            .await
            .map_err(|e| CacheError::backend(e.to_string()))??;

        Ok(())
    }
}

//! Write/read orchestration façade.
//!
//! The write side reacts to property lifecycle events: fetch the
//! authoritative record, validate it, mutate the index, and invalidate
//! the query cache. The read side serves searches through the two-level
//! cache in front of the index.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use property_search_repository::{CacheRepository, SearchIndexRepository};
use property_search_shared::{CachedPage, Property, SearchRequest, SearchResponse};

use crate::client::PropertyFetcher;
use crate::errors::ServiceError;

/// TTL requested for cached result pages.
const CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// The service façade owning both pipelines.
///
/// Re-processing the same `(operation, propertyId)` event is
/// observationally idempotent: create and update are both full document
/// replacements and deleting an absent id is a no-op.
pub struct SearchService {
    index: Arc<dyn SearchIndexRepository>,
    cache: Arc<dyn CacheRepository>,
    fetcher: Arc<dyn PropertyFetcher>,
}

impl SearchService {
    /// Create the service from its collaborators.
    pub fn new(
        index: Arc<dyn SearchIndexRepository>,
        cache: Arc<dyn CacheRepository>,
        fetcher: Arc<dyn PropertyFetcher>,
    ) -> Self {
        Self {
            index,
            cache,
            fetcher,
        }
    }

    /// Handle a `create` event: fetch, validate, index, invalidate.
    #[instrument(skip(self))]
    pub async fn on_create(&self, property_id: &str) -> Result<(), ServiceError> {
        let property = self.fetch_validated(property_id).await?;

        self.index
            .index(&property)
            .await
            .map_err(|e| ServiceError::index(e.to_string()))?;

        info!(id = %property_id, "property indexed");
        self.cache.invalidate_all().await;
        Ok(())
    }

    /// Handle an `update` event. Identical to create: re-indexing the same
    /// id replaces the stored document wholesale.
    #[instrument(skip(self))]
    pub async fn on_update(&self, property_id: &str) -> Result<(), ServiceError> {
        let property = self.fetch_validated(property_id).await?;

        self.index
            .update(&property)
            .await
            .map_err(|e| ServiceError::index(e.to_string()))?;

        info!(id = %property_id, "property re-indexed");
        self.cache.invalidate_all().await;
        Ok(())
    }

    /// Handle a `delete` event. No upstream fetch; deleting an absent id
    /// succeeds.
    #[instrument(skip(self))]
    pub async fn on_delete(&self, property_id: &str) -> Result<(), ServiceError> {
        if property_id.is_empty() {
            return Err(ServiceError::invalid_request(
                "property id cannot be empty",
            ));
        }

        self.index
            .delete(property_id)
            .await
            .map_err(|e| ServiceError::index(e.to_string()))?;

        info!(id = %property_id, "property removed from index");
        self.cache.invalidate_all().await;
        Ok(())
    }

    /// Execute a search through the cache.
    ///
    /// Cache failures are absorbed by the cache layer and degrade to a
    /// miss; only index failures surface as backend errors.
    #[instrument(skip(self, request))]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, ServiceError> {
        let request = request.normalized();
        request.validate().map_err(ServiceError::invalid_request)?;

        let key = request.fingerprint();

        if let Some(cached) = self.cache.get(&key).await {
            debug!(key = %key, "serving search from cache");
            return Ok(SearchResponse::new(
                cached.properties,
                cached.total_results,
                request.page,
                request.page_size,
            ));
        }

        let (properties, total_results) = self
            .index
            .search(&request)
            .await
            .map_err(|e| ServiceError::backend(e.to_string()))?;

        debug!(key = %key, total = total_results, "search executed against index");

        self.cache
            .set(
                &key,
                CachedPage {
                    properties: properties.clone(),
                    total_results,
                },
                CACHE_TTL,
            )
            .await;

        Ok(SearchResponse::new(
            properties,
            total_results,
            request.page,
            request.page_size,
        ))
    }

    /// Fetch the authoritative record and check the index invariants.
    async fn fetch_validated(&self, property_id: &str) -> Result<Property, ServiceError> {
        let property = self
            .fetcher
            .fetch(property_id)
            .await
            .map_err(|e| ServiceError::fetch(e.to_string()))?;

        if let Err(reason) = property.validate() {
            warn!(id = %property_id, reason = %reason, "fetched property failed validation");
            return Err(ServiceError::validation(reason));
        }

        Ok(property)
    }
}

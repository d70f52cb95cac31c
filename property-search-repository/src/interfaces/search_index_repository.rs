//! Search index repository trait definition.

use async_trait::async_trait;

use property_search_shared::{Property, SearchRequest};

use crate::errors::SearchIndexError;

/// Abstracts the search engine backing the property index.
///
/// The repository is the single reader and writer of the index. Every
/// mutation must be durable and visible to subsequent reads before the
/// call returns (read-your-write), which the Solr implementation achieves
/// with an explicit commit after each write.
#[async_trait]
pub trait SearchIndexRepository: Send + Sync {
    /// Probe the engine. Used at startup to fail fast when the index is
    /// unreachable.
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Execute a search and return the matching page together with the
    /// engine's total matching count (not the page size).
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<(Vec<Property>, usize), SearchIndexError>;

    /// Index a property, overwriting any existing document with the same id.
    async fn index(&self, property: &Property) -> Result<(), SearchIndexError>;

    /// Re-index a property. Identical to [`index`](Self::index): updates
    /// are full replacements, never partial merges.
    async fn update(&self, property: &Property) -> Result<(), SearchIndexError>;

    /// Delete a property by id. Deleting an absent id succeeds.
    async fn delete(&self, property_id: &str) -> Result<(), SearchIndexError>;
}

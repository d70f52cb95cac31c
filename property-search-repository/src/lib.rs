//! # Property Search Repository
//!
//! This crate provides traits and implementations for the storage side of
//! the property search service: the Solr-backed search index and the
//! two-level (in-process + memcached) query result cache.

pub mod cache;
pub mod errors;
pub mod interfaces;
pub mod solr;

pub use cache::TieredCache;
pub use errors::{CacheError, SearchIndexError};
pub use interfaces::{CacheRepository, SearchIndexRepository};
pub use solr::SolrRepository;

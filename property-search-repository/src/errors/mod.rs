//! Error types for the property search repository.

mod cache_error;
mod search_index_error;

pub use cache_error::CacheError;
pub use search_index_error::SearchIndexError;

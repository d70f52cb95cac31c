//! Cache error types.
//!
//! Cache failures never fail a request; callers log these and treat the
//! lookup as a miss.

use thiserror::Error;

/// Errors from the distributed cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to connect to the cache backend.
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// A cache backend call failed.
    #[error("Cache backend error: {0}")]
    BackendError(String),

    /// Failed to serialize or deserialize a cached page.
    #[error("Cache serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CacheError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendError(msg.into())
    }
}

impl From<memcache::MemcacheError> for CacheError {
    fn from(err: memcache::MemcacheError) -> Self {
        Self::BackendError(err.to_string())
    }
}

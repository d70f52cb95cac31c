//! Error types for the property search service.

use thiserror::Error;

/// Errors surfaced by the service façade.
///
/// `InvalidRequest` is a user error (HTTP 400); everything else is a
/// backend failure (HTTP 500 on the read path, logged-and-acked on the
/// write path).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// User-supplied parameters failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream properties service could not supply the record.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The fetched record violates the property invariants.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// An index mutation failed.
    #[error("Index operation failed: {0}")]
    IndexFailed(String),

    /// A read-path backend call failed.
    #[error("Backend failure: {0}")]
    Backend(String),
}

impl ServiceError {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexFailed(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// The HTTP status this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            _ => 500,
        }
    }
}

/// Errors from the broker consumer.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// Broker connection, declaration, or channel error.
    #[error("Broker error: {0}")]
    BrokerError(String),

    /// A message payload could not be decoded into an event.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ConsumerError {
    /// Create a broker error.
    pub fn broker(msg: impl Into<String>) -> Self {
        Self::BrokerError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

impl From<lapin::Error> for ConsumerError {
    fn from(err: lapin::Error) -> Self {
        Self::BrokerError(err.to_string())
    }
}

//! Search index error types.
//!
//! Unified error type for all operations against the search engine.

use thiserror::Error;

/// Errors from search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to reach or set up the search engine client.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A select query failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Indexing a document failed.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Deleting a document failed.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// The post-mutation commit failed.
    #[error("Commit error: {0}")]
    CommitError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a commit error.
    pub fn commit(msg: impl Into<String>) -> Self {
        Self::CommitError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

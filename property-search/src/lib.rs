//! # Property Search
//!
//! Search service for the rental-property platform - consumes property
//! lifecycle events from RabbitMQ and maintains a Solr read model served
//! over HTTP.
//!
//! ## Architecture
//!
//! Two disjoint pipelines share state only through the index and the cache:
//!
//! 1. **Write path**: broker → [`consumer`] → [`service`] →
//!    {property fetch, index mutation} → cache invalidation
//! 2. **Read path**: HTTP → [`server`] → cache → index → cache fill →
//!    response
//!
//! ## Modules
//!
//! - [`client`]: Upstream properties-api client
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: RabbitMQ consumer for property events
//! - [`server`]: HTTP surface for `/search` and `/health`
//! - [`service`]: Write/read orchestration façade
//! - [`errors`]: Error types for the service

pub mod client;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod server;
pub mod service;

pub use config::Dependencies;
pub use errors::ServiceError;

use thiserror::Error;

/// Errors that can occur during application startup or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration or dependency initialization error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Broker consumer error.
    #[error("Consumer error: {0}")]
    ConsumerError(#[from] errors::ConsumerError),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}

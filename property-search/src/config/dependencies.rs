//! Dependency initialization and wiring.
//!
//! Collaborators are built in dependency order: index repository, cache,
//! upstream client, service façade, broker consumer, then the HTTP
//! router. Any failure here is a fatal startup error.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info;

use property_search_repository::{SearchIndexRepository, SolrRepository, TieredCache};

use crate::client::PropertyClient;
use crate::config::Config;
use crate::consumer::{RabbitMqConsumer, PROPERTY_EVENTS_QUEUE};
use crate::server::create_router;
use crate::service::SearchService;
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The service façade shared by the consumer and the HTTP handlers.
    pub service: Arc<SearchService>,

    /// The broker consumer, ready to run.
    pub consumer: Arc<RabbitMqConsumer>,

    /// The HTTP application router.
    pub router: Router,

    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// Probes the search engine before wiring anything else so an
    /// unreachable index fails startup rather than the first request.
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let index = SolrRepository::new(&config.solr_url)
            .map_err(|e| AppError::config(format!("failed to create Solr repository: {e}")))?;
        index
            .ping()
            .await
            .map_err(|e| AppError::config(format!("search engine unreachable: {e}")))?;
        info!(url = %config.solr_url, "search engine reachable");

        let cache = TieredCache::connect(&config.memcached_host)
            .map_err(|e| AppError::config(format!("failed to connect to memcached: {e}")))?;
        info!(host = %config.memcached_host, "cache initialized");

        let fetcher = PropertyClient::new(&config.properties_api_url)
            .map_err(|e| AppError::config(format!("failed to create properties client: {e}")))?;

        let service = Arc::new(SearchService::new(
            Arc::new(index),
            Arc::new(cache),
            Arc::new(fetcher),
        ));

        let consumer = Arc::new(
            RabbitMqConsumer::connect(
                &config.rabbitmq_url,
                PROPERTY_EVENTS_QUEUE,
                Arc::clone(&service),
            )
            .await?,
        );

        let router = create_router(Arc::clone(&service));
        let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

        Ok(Self {
            service,
            consumer,
            router,
            listen_addr,
        })
    }
}

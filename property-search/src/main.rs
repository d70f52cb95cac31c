//! Property Search Main Entry Point
//!
//! This is the main binary for the property search service. It consumes
//! property lifecycle events from RabbitMQ, maintains the Solr read model,
//! and serves `/search` and `/health` over HTTP.

use dotenv::dotenv;
use property_search::config::Config;
use property_search::{AppError, Dependencies};
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("property_search=info,property_search_repository=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!(
        service_name = "property-search",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    info!("Starting property search service");

    let config = Config::from_env();
    info!(
        solr_url = %config.solr_url,
        memcached_host = %config.memcached_host,
        rabbitmq_url = %config.rabbitmq_url,
        properties_api_url = %config.properties_api_url,
        server_port = config.server_port,
        "Configuration loaded"
    );

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Consume property events in the background.
    let consumer = deps.consumer.clone();
    let consumer_shutdown = shutdown_tx.subscribe();
    let consumer_handle = tokio::spawn(async move {
        if let Err(e) = consumer.run(consumer_shutdown).await {
            error!(error = %e, "Consumer error");
        }
    });

    let listener = tokio::net::TcpListener::bind(deps.listen_addr)
        .await
        .map_err(|e| AppError::server(format!("failed to bind {}: {e}", deps.listen_addr)))?;
    info!(addr = %deps.listen_addr, "HTTP server listening");

    let server_shutdown = shutdown_tx.clone();
    let server = axum::serve(listener, deps.router.clone()).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = server_shutdown.send(());
    });

    if let Err(e) = server.await {
        error!(error = %e, "HTTP server error");
        let _ = shutdown_tx.send(());
        let _ = consumer_handle.await;
        deps.consumer.close().await;
        return Err(AppError::server(e.to_string()));
    }

    // The server drained its in-flight requests; now let the consumer
    // settle its message and close the broker connection.
    let _ = shutdown_tx.send(());
    let _ = consumer_handle.await;
    deps.consumer.close().await;

    info!("Property search service stopped");
    Ok(())
}

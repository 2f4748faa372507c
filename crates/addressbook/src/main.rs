//! Address book service.
//!
//! Serves contact records over HTTP, backed by MongoDB or an in-memory store.

use std::sync::Arc;

use addressbook_persistence::backends::memory::MemoryBackend;
use addressbook_persistence::core::{Backend, BackendKind, RecordStorage};
use addressbook_persistence::health::HealthMonitor;
use addressbook_rest::{AppState, ServerConfig, create_app_with_state, init_logging};
use clap::Parser;
use tracing::{info, warn};

#[cfg(feature = "mongodb")]
use addressbook_persistence::backends::mongodb::MongoBackend;

/// Starts the Axum HTTP server and runs until a shutdown signal arrives.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Runs the server over `backend` with the health monitor attached.
async fn run<B>(backend: Arc<B>, config: ServerConfig) -> anyhow::Result<()>
where
    B: RecordStorage + Backend + 'static,
{
    let mut monitor = HealthMonitor::new(config.health_config());
    let monitor_task = monitor.start(backend.clone());

    let state = AppState::new(backend, config.clone()).with_health(monitor.status_handle());
    let app = create_app_with_state(state);
    let result = serve(app, &config).await;

    monitor.stop().await;
    if let Err(e) = monitor_task.await {
        warn!(error = %e, "Health monitor task ended abnormally");
    }

    result
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        env = %config.environment,
        revision = %config.revision,
        storage_backend = %config.storage_backend,
        "Starting address book service"
    );

    match config.storage_backend {
        BackendKind::MongoDB => start_mongodb(config).await,
        BackendKind::Memory => start_memory(config).await,
    }
}

/// Starts the server with the in-memory backend.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    warn!("Using the in-memory backend; records are lost on exit");
    let backend = Arc::new(MemoryBackend::with_config(config.memory_config()));
    run(backend, config).await
}

/// Starts the server with the MongoDB backend.
#[cfg(feature = "mongodb")]
async fn start_mongodb(config: ServerConfig) -> anyhow::Result<()> {
    let mongo_config = config.mongo_config();
    info!(
        url = %mongo_config.redacted_connection_string(),
        database = %mongo_config.database,
        collection = %mongo_config.collection,
        "Initializing MongoDB backend"
    );

    let backend = MongoBackend::connect(mongo_config).await?;

    // Without the indexes the service still works, with the create race open.
    if let Err(e) = backend.initialize().await {
        warn!(error = %e, "Failed to create unique indexes");
    }

    run(Arc::new(backend), config).await
}

/// Fallback when mongodb feature is not enabled.
#[cfg(not(feature = "mongodb"))]
async fn start_mongodb(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The mongodb backend requires the 'mongodb' feature. \
         Build with: cargo build -p addressbook --features mongodb"
    )
}

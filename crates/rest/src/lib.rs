//! # addressbook-rest - HTTP API for the address book
//!
//! This crate exposes the contact records managed by
//! [`addressbook_persistence`] over HTTP with JSON and CSV representations.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use addressbook_persistence::backends::memory::MemoryBackend;
//! use addressbook_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(MemoryBackend::new(), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! Contact routes live under `/api/v1/addressbook`:
//!
//! | Operation | HTTP Method | URL Pattern | Success |
//! |-----------|-------------|-------------|---------|
//! | list | GET | `/` or `/user` | 200 JSON array |
//! | create | POST | `/user` | 200 `{"id"}` |
//! | read | GET | `/user/{id}` | 200 record |
//! | update | PUT | `/user/{id}` | 200 record |
//! | delete | DELETE | `/user/{id}` | 200 `{"id"}` |
//! | export | GET | `/export` | 200 `text/csv`, 204 when empty |
//! | import | PUT | `/import` | 302 to `/api/v1/addressbook/` |
//! | clear | GET | `/clear` | 200 |
//!
//! `GET /health` and `GET /status` are served at the root.
//!
//! ## Error Handling
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Invalid id, malformed JSON or CSV, field validation failure |
//! | 404 | Unknown record or path |
//! | 409 | Phone or e-mail already in use |
//! | 413 | Import body too large |
//! | 415 | Import body is not `text/csv` |
//! | 500 | Datastore failure or aborted import |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (service, configuration, health)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request counting and request ids
//! - [`extractors`] - Path, JSON and CSV extractors
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use addressbook_persistence::core::RecordStorage;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version, reported by the status endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// The health handle is left detached, so `/health` reports an unknown
/// status. Use [`create_app_with_state`] to attach a running monitor.
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application from prepared state.
///
/// This sets up every route together with tracing, request ids, the request
/// timeout and, when enabled, CORS.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    let config = state.config().clone();
    info!(
        "Creating REST API server with backend: {}",
        state.service().storage().backend_name()
    );

    // Build the router with all routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(middleware::request_id::set_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(middleware::request_id::make_request_span))
        .layer(middleware::request_id::propagate_request_id_layer())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "addressbook={level},addressbook_rest={level},\
             addressbook_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_builds_from_lists() {
        let config = ServerConfig {
            cors_origins: "http://localhost:3000, http://example.com".to_string(),
            ..Default::default()
        };
        // Construction must not panic on explicit lists.
        let _ = build_cors_layer(&config);
    }
}

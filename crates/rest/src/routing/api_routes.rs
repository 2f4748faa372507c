//! Address book route configuration.

use addressbook_persistence::core::RecordStorage;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::{get, put},
};

use crate::error::RestError;
use crate::handlers;
use crate::middleware::request_counter_middleware;
use crate::state::AppState;

/// Prefix of the contact API.
pub const API_PREFIX: &str = "/api/v1/addressbook";

/// Creates all address book routes.
///
/// # Routes
///
/// ## Operational
/// - `GET /health` - Health check
/// - `GET /status` - Status report
///
/// ## Under [`API_PREFIX`]
/// - `GET` on the prefix itself, `/` or `/user` - List contacts
/// - `POST /user` - Create
/// - `GET /user/{id}` - Read
/// - `PUT /user/{id}` - Update
/// - `DELETE /user/{id}` - Delete
/// - `GET /export` - CSV export
/// - `PUT /import` - CSV import
/// - `GET /clear` - Remove every contact
///
/// Anything else answers 404.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    let import_limit = DefaultBodyLimit::max(state.config().max_import_size);
    let path = |suffix: &str| format!("{}{}", API_PREFIX, suffix);

    Router::new()
        // Operational routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/status", get(handlers::status_handler::<S>))
        // Collection routes
        .route(API_PREFIX, get(handlers::list_handler::<S>))
        .route(&path("/"), get(handlers::list_handler::<S>))
        .route(
            &path("/user"),
            get(handlers::list_handler::<S>).post(handlers::create_handler::<S>),
        )
        // Instance routes
        .route(
            &path("/user/{id}"),
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        )
        // Bulk routes
        .route(&path("/export"), get(handlers::export_handler::<S>))
        .route(
            &path("/import"),
            put(handlers::import_handler::<S>).layer(import_limit),
        )
        .route(&path("/clear"), get(handlers::clear_handler::<S>))
        .fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_counter_middleware::<S>,
        ))
        .with_state(state)
}

/// Answers requests that match no route.
async fn fallback_handler(uri: Uri) -> RestError {
    RestError::NotFound {
        message: format!("invalid path {}", uri.path()),
    }
}

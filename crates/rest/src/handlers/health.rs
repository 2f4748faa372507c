//! Health and status endpoint handlers.
//!
//! `/health` is meant for load balancers: it answers 503 only while the
//! datastore connection is degraded. `/status` is the human facing report.

use addressbook_persistence::core::RecordStorage;
use addressbook_persistence::health::ConnectionStatus;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Body of the status report.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Application version.
    pub version: &'static str,
    /// Build revision.
    pub revision: String,
    /// Deployment environment.
    pub env: String,
    /// Datastore connection status, as text.
    pub status: &'static str,
    /// Datastore connection status, as a number.
    pub status_code: u8,
    /// Start time, RFC 3339.
    pub started_time: String,
    /// Requests served since start.
    pub requests_count: u64,
}

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Datastore healthy, or not probed yet
/// - `503 Service Unavailable` - Datastore connection degraded
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing health check request");

    let snapshot = state.health().snapshot();
    let status = if snapshot.status == ConnectionStatus::Degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let body = serde_json::json!({
        "status": snapshot.status,
        "backend": state.service().storage().backend_name(),
        "last_error": snapshot.last_error,
        "last_checked": snapshot.last_checked.map(|t| t.to_rfc3339()),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(body)).into_response()
}

/// Handler for the status report.
///
/// # HTTP Request
///
/// `GET [base]/status`
pub async fn status_handler<S>(State(state): State<AppState<S>>) -> Json<StatusReport>
where
    S: RecordStorage + Send + Sync,
{
    let status = state.health().status();
    let config = state.config();

    Json(StatusReport {
        version: crate::VERSION,
        revision: config.revision.clone(),
        env: config.environment.clone(),
        status: status.description(),
        status_code: status.code(),
        started_time: state.started().to_rfc3339(),
        requests_count: state.request_count(),
    })
}

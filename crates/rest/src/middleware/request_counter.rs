//! Request counting middleware.
//!
//! Every request that reaches the router bumps the counter shown as
//! `requests_count` by the status endpoint.

use addressbook_persistence::core::RecordStorage;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Middleware function counting requests.
///
/// This is used with `axum::middleware::from_fn_with_state`.
pub async fn request_counter_middleware<S>(
    State(state): State<AppState<S>>,
    request: Request,
    next: Next,
) -> Response
where
    S: RecordStorage + Send + Sync + 'static,
{
    state.record_request();
    next.run(request).await
}

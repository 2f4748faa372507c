//! Create handler.
//!
//! `POST [base]/user`

use addressbook_persistence::core::RecordStorage;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::ContactBody;
use crate::state::AppState;

/// Handler for creating a contact.
///
/// The server assigns the id. All field violations are reported at once,
/// and a phone or e-mail already in use is a conflict.
///
/// # HTTP Request
///
/// `POST [base]/user`
///
/// # Response
///
/// - `200 OK` - Created, body is `{"id": "<hex>"}`
/// - `400 Bad Request` - Malformed JSON or invalid fields
/// - `409 Conflict` - Phone or e-mail already in use
///
/// # Example
///
/// ```http
/// POST /api/v1/addressbook/user HTTP/1.1
/// Content-Type: application/json
///
/// {"first_name": "John", "last_name": "Doe", "email": "john@example.com", "phone": "555"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    ContactBody(input): ContactBody,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing create request");

    let id = state.service().create(input).await?;

    Ok((StatusCode::OK, Json(json!({ "id": id }))).into_response())
}

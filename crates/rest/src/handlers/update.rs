//! Update handler.
//!
//! `PUT [base]/user/{id}`

use addressbook_persistence::core::RecordStorage;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{ContactBody, RecordIdPath};
use crate::state::AppState;

/// Handler for replacing a contact's fields.
///
/// Any `id` in the body is ignored; the path decides which record changes.
///
/// # Response
///
/// - `200 OK` - The updated record
/// - `400 Bad Request` - Bad id, malformed JSON or invalid fields
/// - `404 Not Found` - No record has the id
/// - `409 Conflict` - The new phone or e-mail belongs to another record
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    RecordIdPath(id): RecordIdPath,
    ContactBody(input): ContactBody,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id = %id, "Processing update request");

    let record = state.service().update(id, input).await?;
    Ok(Json(record).into_response())
}

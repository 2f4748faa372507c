//! Delete handler.
//!
//! `DELETE [base]/user/{id}`

use addressbook_persistence::core::RecordStorage;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordIdPath;
use crate::state::AppState;

/// Handler for removing a contact.
///
/// # Response
///
/// - `200 OK` - Removed, body is `{"id": "<hex>"}`
/// - `400 Bad Request` - The id is not a valid identifier
/// - `404 Not Found` - No record has the id
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    RecordIdPath(id): RecordIdPath,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id = %id, "Processing delete request");

    state.service().delete(&id).await?;
    Ok(Json(json!({ "id": id })).into_response())
}

//! Read and list handlers.
//!
//! `GET [base]/user/{id}`, `GET [base]/user` and `GET [base]/`

use addressbook_persistence::core::RecordStorage;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordIdPath;
use crate::state::AppState;

/// Handler for reading one contact.
///
/// # Response
///
/// - `200 OK` - The record
/// - `400 Bad Request` - The id is not a valid identifier
/// - `404 Not Found` - No record has the id
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    RecordIdPath(id): RecordIdPath,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id = %id, "Processing read request");

    let record = state.service().get(&id).await?;
    Ok(Json(record).into_response())
}

/// Handler for listing every contact.
///
/// Always answers with a JSON array, empty when there are no contacts.
pub async fn list_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let records = state.service().list().await?;
    debug!(count = records.len(), "Listed users");

    Ok(Json(records).into_response())
}

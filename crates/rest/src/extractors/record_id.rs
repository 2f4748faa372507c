//! Record id path extractor.

use addressbook_persistence::RecordId;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::RestError;

/// The `{id}` path segment, parsed into a [`RecordId`].
///
/// Malformed ids are rejected with 400 before any handler code runs, so a
/// bad id never reaches the datastore.
///
/// # Example
///
/// ```rust,ignore
/// use addressbook_rest::extractors::RecordIdPath;
///
/// async fn handler(RecordIdPath(id): RecordIdPath) {
///     println!("id: {}", id);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordIdPath(pub RecordId);

impl<S> FromRequestParts<S> for RecordIdPath
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: e.body_text(),
            })?;

        let id = RecordId::parse(&raw)?;
        Ok(RecordIdPath(id))
    }
}

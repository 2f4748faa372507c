//! JSON contact body extractor.

use addressbook_persistence::RecordInput;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::RestError;

/// A contact decoded from a JSON request body.
///
/// Missing fields default to empty strings and a client-supplied `id` is
/// ignored. A body without a `Content-Type` header is read as JSON.
#[derive(Debug)]
pub struct ContactBody(pub RecordInput);

impl ContactBody {
    /// Consumes the extractor and returns the decoded input.
    pub fn into_inner(self) -> RecordInput {
        self.0
    }
}

/// Error type for contact body extraction failures.
#[derive(Debug)]
pub enum ContactBodyRejection {
    /// The body could not be read or is not valid JSON.
    InvalidJson(String),
    /// The body is not JSON.
    UnsupportedMediaType(String),
}

impl IntoResponse for ContactBodyRejection {
    fn into_response(self) -> Response {
        let error = match self {
            ContactBodyRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
            ContactBodyRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
        };
        error.into_response()
    }
}

impl<S> FromRequest<S> for ContactBody
where
    S: Send + Sync,
{
    type Rejection = ContactBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(ct) = content_type {
            let is_json = ct
                .parse::<mime::Mime>()
                .map(|m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
                .unwrap_or(false);
            if !is_json {
                return Err(ContactBodyRejection::UnsupportedMediaType(ct));
            }
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ContactBodyRejection::InvalidJson(e.to_string()))?;

        let input: RecordInput = serde_json::from_slice(&bytes)
            .map_err(|e| ContactBodyRejection::InvalidJson(e.to_string()))?;

        Ok(ContactBody(input))
    }
}

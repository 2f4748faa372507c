//! CSV import body extractor.

use addressbook_persistence::core::RecordStorage;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header},
};

use crate::error::RestError;
use crate::state::AppState;

/// A `text/csv` request body, capped at the configured import size.
///
/// The limit itself is enforced by the `DefaultBodyLimit` layer on the
/// import route; this extractor turns the resulting rejection into a
/// [`RestError::PayloadTooLarge`].
#[derive(Debug)]
pub struct CsvBody(pub Bytes);

/// Returns `true` if the request declares a `text/csv` body.
pub fn is_csv(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == mime::TEXT_CSV.essence_str())
}

impl<S> FromRequest<AppState<S>> for CsvBody
where
    S: RecordStorage + Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &AppState<S>) -> Result<Self, Self::Rejection> {
        if !is_csv(req.headers()) {
            let content_type = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            return Err(RestError::UnsupportedMediaType { content_type });
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RestError::PayloadTooLarge {
                    limit: state.config().max_import_size,
                }
            } else {
                RestError::BadRequest {
                    message: e.body_text(),
                }
            }
        })?;

        Ok(CsvBody(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_is_csv() {
        assert!(is_csv(&headers("text/csv")));
        assert!(is_csv(&headers("text/csv; charset=utf-8")));
        assert!(!is_csv(&headers("application/json")));
        assert!(!is_csv(&HeaderMap::new()));
    }
}

//! CSV import, export and clear handlers.
//!
//! - `PUT [base]/import` - Load contacts from a CSV body
//! - `GET [base]/export` - Download every contact as CSV
//! - `GET [base]/clear` - Remove every contact

use addressbook_persistence::bulk::ImportMode;
use addressbook_persistence::core::RecordStorage;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::error::RestResult;
use crate::extractors::CsvBody;
use crate::state::AppState;

/// Header selecting the import mode.
pub static APPEND_TYPE: HeaderName = HeaderName::from_static("append-type");

/// Where a successful import redirects to.
pub const IMPORT_REDIRECT: &str = "/api/v1/addressbook/";

/// File name offered for the export download.
pub const EXPORT_FILE_NAME: &str = "import.csv";

/// Handler for CSV import.
///
/// Rows are `id,first_name,last_name,email,phone` with no header line.
/// Malformed and invalid rows are skipped. The `Append-Type` header picks
/// the mode:
///
/// - `clear` - Remove every contact first, then insert the rows
/// - `append` - Insert the rows, failing on an id that already exists
/// - anything else or absent - Insert or replace each row by id
///
/// # Response
///
/// - `302 Found` - Imported, redirects to the API root
/// - `400 Bad Request` - Empty or malformed body
/// - `413 Payload Too Large` - Body exceeds the configured limit
/// - `415 Unsupported Media Type` - Body is not `text/csv`
/// - `500 Internal Server Error` - A write failed; earlier rows stay applied
pub async fn import_handler<S>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    CsvBody(body): CsvBody,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync + 'static,
{
    let mode = ImportMode::from_header(headers.get(&APPEND_TYPE).and_then(|v| v.to_str().ok()));
    debug!(mode = %mode, bytes = body.len(), "Processing import request");

    let summary = state.service().import(&body, mode).await?;
    info!(
        mode = %summary.mode,
        applied = summary.applied,
        skipped = summary.skipped,
        "CSV imported"
    );

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, HeaderValue::from_static(IMPORT_REDIRECT))],
    )
        .into_response())
}

/// Handler for CSV export.
///
/// # Response
///
/// - `200 OK` - `text/csv` attachment named `import.csv`
/// - `204 No Content` - There are no contacts
pub async fn export_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing export request");

    let csv = state.service().export().await?;
    let disposition = format!("attachment; filename={}", EXPORT_FILE_NAME);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Handler removing every contact.
///
/// # Response
///
/// - `200 OK` - Empty body
pub async fn clear_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let removed = state.service().clear_all().await?;
    debug!(removed, "Processed clear request");

    Ok(StatusCode::OK.into_response())
}

//! Error types for the address book API.
//!
//! Every failure a handler can produce is a [`RestError`]. The variant alone
//! decides the HTTP status; persistence errors are converted through `From`
//! impls so handlers can use `?` on service calls.
//!
//! # Error Mapping
//!
//! | Storage Error | RestError | HTTP Status |
//! |--------------|-----------|-------------|
//! | RecordError::NotFound | NotFound | 404 |
//! | RecordError::AlreadyExists | Conflict | 409 |
//! | ValidationError::InvalidRecord | InvalidRecord | 400 |
//! | ValidationError::InvalidIdentifier | BadIdentifier | 400 |
//! | ImportError::EmptyInput, ImportError::Parse | BadRequest | 400 |
//! | ImportError::Aborted | ImportAborted | 500 |
//! | ExportError::Empty | NoContent | 204 |
//! | BackendError::Unavailable, BackendError::ConnectionFailed | Unavailable | 500 |
//! | anything else | InternalError | 500 |
//!
//! Simple failures have the body `{"error": "<message>"}`. Validation
//! failures return an array with one `{"error": ...}` object per violated
//! field. Internal details are logged and never returned to the client.

use addressbook_persistence::error::{
    BackendError, ExportError, ImportError, RecordError, StorageError, ValidationError,
};
use addressbook_persistence::validation::Violation;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// The primary error type for REST API operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// Record or path not found (HTTP 404).
    #[error("{message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// Uniqueness violation (HTTP 409).
    #[error("{message}")]
    Conflict {
        /// Error message.
        message: String,
    },

    /// Malformed request (HTTP 400).
    #[error("{message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Path parameter is not a valid record id (HTTP 400).
    #[error("not a valid id: {value}")]
    BadIdentifier {
        /// The rejected value.
        value: String,
    },

    /// One or more fields failed validation (HTTP 400).
    #[error("invalid record")]
    InvalidRecord {
        /// Every violated rule.
        violations: Vec<Violation>,
    },

    /// Unsupported media type (HTTP 415).
    #[error("unsupported content type: {content_type}")]
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Request body exceeds the configured limit (HTTP 413).
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// The limit in bytes.
        limit: usize,
    },

    /// Nothing to return (HTTP 204).
    #[error("{message}")]
    NoContent {
        /// Reason, logged only.
        message: String,
    },

    /// A bulk import stopped part way through (HTTP 500).
    #[error("import aborted at row {row} after {applied} records")]
    ImportAborted {
        /// Records written before the failure.
        applied: usize,
        /// Line of the failing row.
        row: usize,
        /// Underlying failure, logged only.
        message: String,
    },

    /// The datastore cannot be reached (HTTP 500).
    #[error("datastore unavailable: {message}")]
    Unavailable {
        /// Underlying failure, logged only.
        message: String,
    },

    /// Internal server error (HTTP 500).
    #[error("internal error: {message}")]
    InternalError {
        /// Underlying failure, logged only.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::BadRequest { .. }
            | RestError::BadIdentifier { .. }
            | RestError::InvalidRecord { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::NoContent { .. } => StatusCode::NO_CONTENT,
            RestError::ImportAborted { .. }
            | RestError::Unavailable { .. }
            | RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            RestError::NoContent { .. } => return status.into_response(),
            RestError::InvalidRecord { violations } => violations
                .iter()
                .map(|v| json!({ "error": v.message }))
                .collect::<Vec<_>>()
                .into(),
            RestError::ImportAborted {
                applied,
                row,
                message,
            } => {
                error!(applied, row, error = %message, "Import aborted");
                json!({
                    "error": self.to_string(),
                    "applied": applied,
                    "row": row,
                })
            }
            RestError::Unavailable { message } => {
                error!(error = %message, "Datastore unavailable");
                json!({ "error": "datastore unavailable" })
            }
            RestError::InternalError { message } => {
                error!(error = %message, "Internal error");
                json!({ "error": "internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Record(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
            StorageError::Import(e) => e.into(),
            StorageError::Export(e) => e.into(),
        }
    }
}

impl From<RecordError> for RestError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            RecordError::AlreadyExists { .. } => RestError::Conflict {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidRecord { violations } => {
                RestError::InvalidRecord { violations }
            }
            ValidationError::InvalidIdentifier { value } => RestError::BadIdentifier { value },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable { .. } | BackendError::ConnectionFailed { .. } => {
                RestError::Unavailable {
                    message: err.to_string(),
                }
            }
            _ => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<ImportError> for RestError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::EmptyInput | ImportError::Parse { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
            ImportError::Aborted {
                applied,
                row,
                source,
            } => RestError::ImportAborted {
                applied,
                row,
                message: source.to_string(),
            },
        }
    }
}

impl From<ExportError> for RestError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => RestError::NoContent {
                message: err.to_string(),
            },
            ExportError::WriteError { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

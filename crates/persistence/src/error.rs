//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates record state errors, validation errors,
//! backend errors and bulk transfer errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::types::UniqueField;
use crate::validation::Violation;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// CSV import errors
    #[error(transparent)]
    Import(#[from] ImportError),

    /// CSV export errors
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl StorageError {
    /// Returns `true` when the error means the datastore could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::Backend(
                BackendError::Unavailable { .. } | BackendError::ConnectionFailed { .. }
            )
        )
    }
}

/// Which uniqueness rule a conflicting write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKey {
    /// Another record already uses the e-mail address.
    Email,
    /// Another record already uses the phone number.
    Phone,
    /// A record with the same identifier already exists.
    Id,
    /// The datastore reported a duplicate without naming the key.
    Unknown,
}

impl From<UniqueField> for ConflictKey {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::Email => ConflictKey::Email,
            UniqueField::Phone => ConflictKey::Phone,
        }
    }
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKey::Email => write!(f, "email"),
            ConflictKey::Phone => write!(f, "phone"),
            ConflictKey::Id => write!(f, "id"),
            ConflictKey::Unknown => write!(f, "unknown key"),
        }
    }
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The requested record was not found.
    #[error("user not found: {id}")]
    NotFound { id: String },

    /// A record with the same unique key already exists.
    #[error("user already exists (duplicate {key})")]
    AlreadyExists { key: ConflictKey },
}

/// Errors related to record validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The record failed one or more field checks.
    #[error("invalid user: {}", join_violations(.violations))]
    InvalidRecord { violations: Vec<Violation> },

    /// The identifier is not a 24 character hex object id.
    #[error("not a valid id: {value}")]
    InvalidIdentifier { value: String },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema or index setup failed.
    #[error("schema initialization failed: {message}")]
    SchemaError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Errors related to CSV import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The request body was empty.
    #[error("Input is empty")]
    EmptyInput,

    /// The body is not well-formed CSV.
    #[error("malformed CSV: {message}")]
    Parse { message: String },

    /// A write failed part way through the import.
    #[error("import aborted at row {row} after {applied} records: {source}")]
    Aborted {
        applied: usize,
        row: usize,
        #[source]
        source: Box<StorageError>,
    },
}

/// Errors related to CSV export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// There are no records to export.
    #[error("There is nothing to show")]
    Empty,

    /// Error writing export output.
    #[error("export write error: {message}")]
    WriteError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::WriteError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        crate::backends::mongodb::classify_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Record(RecordError::NotFound {
            id: "5c8a1d5b0190b214360dc031".to_string(),
        });
        assert_eq!(err.to_string(), "user not found: 5c8a1d5b0190b214360dc031");
    }

    #[test]
    fn test_conflict_display_names_key() {
        let err = RecordError::AlreadyExists {
            key: ConflictKey::Phone,
        };
        assert_eq!(err.to_string(), "user already exists (duplicate phone)");
    }

    #[test]
    fn test_invalid_record_joins_messages() {
        let err = ValidationError::InvalidRecord {
            violations: vec![
                Violation::new("email", "email is incorrect"),
                Violation::new("first_name", "first name is incorrect"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid user: email is incorrect; first name is incorrect"
        );
    }

    #[test]
    fn test_import_error_display() {
        assert_eq!(ImportError::EmptyInput.to_string(), "Input is empty");

        let err = ImportError::Aborted {
            applied: 2,
            row: 3,
            source: Box::new(StorageError::Backend(BackendError::Unavailable {
                backend_name: "mongodb".to_string(),
                message: "no servers".to_string(),
            })),
        };
        assert!(err.to_string().contains("row 3 after 2 records"));
    }

    #[test]
    fn test_is_unavailable() {
        let err = StorageError::Backend(BackendError::Unavailable {
            backend_name: "memory".to_string(),
            message: "down".to_string(),
        });
        assert!(err.is_unavailable());

        let err = StorageError::Record(RecordError::NotFound { id: "x".to_string() });
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_conflict_key_from_unique_field() {
        assert_eq!(ConflictKey::from(UniqueField::Email), ConflictKey::Email);
        assert_eq!(ConflictKey::from(UniqueField::Phone), ConflictKey::Phone);
    }
}

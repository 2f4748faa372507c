//! MongoDB backend implementation.
//!
//! Stores one document per contact in a single collection, keyed by the
//! document's `_id` object id.
//!
//! # Features
//!
//! - Startup connection with bounded retries
//! - Ping based health checks and client refresh for the health monitor
//! - Optional unique partial indexes on `email` and `phone`
//! - Duplicate-key writes reported as
//!   [`RecordError::AlreadyExists`](crate::error::RecordError::AlreadyExists)
//!
//! # Example
//!
//! ```no_run
//! use addressbook_persistence::backends::mongodb::{MongoBackend, MongoBackendConfig};
//! use addressbook_persistence::core::Backend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MongoBackendConfig::from_parts("127.0.0.1:27017", "", "", "addressbook");
//! let backend = MongoBackend::connect(config).await?;
//! backend.initialize().await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod document;
mod storage;

pub use backend::MongoBackend;
pub use config::MongoBackendConfig;

use mongodb::error::{ErrorKind, WriteFailure};

use crate::error::{BackendError, ConflictKey, RecordError, StorageError};

pub(crate) const BACKEND_NAME: &str = "mongodb";

const DUPLICATE_KEY: i32 = 11000;

/// Maps a driver error onto the storage error hierarchy.
pub(crate) fn classify_error(err: mongodb::error::Error) -> StorageError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.clone())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => Some(e.message.clone()),
        _ => None,
    };
    if let Some(message) = duplicate {
        return StorageError::Record(RecordError::AlreadyExists {
            key: conflict_key(&message),
        });
    }

    let unavailable = matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
    );
    let serialization = matches!(
        err.kind.as_ref(),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_)
    );

    if unavailable {
        StorageError::Backend(BackendError::Unavailable {
            backend_name: BACKEND_NAME.to_string(),
            message: err.to_string(),
        })
    } else if serialization {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    } else {
        StorageError::Backend(BackendError::Internal {
            backend_name: BACKEND_NAME.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

// Server messages look like:
// E11000 duplicate key error collection: addressbook.users index: email_1 dup key: { ... }
fn conflict_key(message: &str) -> ConflictKey {
    let index = message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default();

    if index.starts_with("email") {
        ConflictKey::Email
    } else if index.starts_with("phone") {
        ConflictKey::Phone
    } else if index.starts_with("_id") {
        ConflictKey::Id
    } else {
        ConflictKey::Unknown
    }
}

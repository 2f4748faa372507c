//! Address book persistence layer.
//!
//! This crate stores contact records in a document database and implements
//! the business rules around them: field validation, uniqueness of e-mail and
//! phone, CSV bulk import/export, and background monitoring of the datastore
//! connection.
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! addressbook-persistence = { version = "0.1", features = ["mongodb"] }
//! ```
//!
//! Available backend features:
//! - `mongodb` (default) - MongoDB document storage
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`types`] - Record, identifier and input types
//! - [`validation`] - Field format checks
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage and backend traits
//! - [`backends`] - Backend implementations (MongoDB, memory)
//! - [`service`] - The record service with create/update/import/export rules
//! - [`bulk`] - CSV parsing and rendering
//! - [`health`] - Connection health monitor
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use addressbook_persistence::backends::memory::MemoryBackend;
//! use addressbook_persistence::types::RecordInput;
//! use addressbook_persistence::RecordService;
//!
//! # tokio_test_block_on(async {
//! let service = RecordService::new(Arc::new(MemoryBackend::new()));
//!
//! let id = service
//!     .create(RecordInput {
//!         first_name: "John".into(),
//!         last_name: "Doe".into(),
//!         email: "john@example.com".into(),
//!         phone: "555-0100".into(),
//!     })
//!     .await
//!     .unwrap();
//!
//! let stored = service.get(&id).await.unwrap();
//! assert_eq!(stored.first_name, "John");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod bulk;
pub mod core;
pub mod error;
pub mod health;
pub mod service;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use service::RecordService;
pub use types::{Record, RecordId, RecordInput};

// Re-export core traits
pub use core::{Backend, BackendKind, RecordStorage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Core types for the persistence layer.
//!
//! - [`RecordId`] - The datastore identifier of a stored contact
//! - [`Record`] - A contact as stored and as returned to clients
//! - [`RecordInput`] - The client-supplied fields of a create or update
//! - [`UniqueField`] - The secondary keys that must be unique across records
//!
//! # Examples
//!
//! ```
//! use addressbook_persistence::types::{Record, RecordId};
//!
//! let id: RecordId = "5c8a1d5b0190b214360dc031".parse().unwrap();
//! let record = Record::new("John", "Doe", "john@example.com", "+1 555 0100").with_id(id);
//!
//! assert_eq!(record.id.unwrap().to_string(), "5c8a1d5b0190b214360dc031");
//! ```

mod record;
mod record_id;

pub use record::{Record, RecordInput, UniqueField};
pub use record_id::RecordId;

//! Core storage traits and abstractions.
//!
//! - [`Backend`] - Connection-level driver abstraction (ping, reconnect, schema)
//! - [`RecordStorage`] - Document operations on the contact collection
//!
//! A concrete backend implements both; the record service only needs
//! [`RecordStorage`], while startup and the health monitor only need
//! [`Backend`].

mod backend;
mod storage;

pub use backend::{Backend, BackendKind};
pub use storage::RecordStorage;

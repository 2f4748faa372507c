//! Database backend implementations.
//!
//! This module contains implementations of the storage traits for the
//! supported backends.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | MongoDB | `mongodb` (default) | Document store, the production backend |
//! | Memory | always | In-process store for tests and local runs |
//!
//! # Example
//!
//! ```
//! use addressbook_persistence::backends::memory::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! assert!(backend.is_empty());
//! ```

pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongodb;

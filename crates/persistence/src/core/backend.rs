//! Backend abstraction for database drivers.
//!
//! This module defines the [`Backend`] trait, the connection-level view of a
//! datastore used by startup code and the health monitor.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::BackendError;

/// Identifies the type of database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// MongoDB (document store).
    MongoDB,
    /// In-process store.
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::MongoDB => write!(f, "mongodb"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(BackendKind::MongoDB),
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// A database backend whose connection can be probed and refreshed.
///
/// The trait is object-safe so the health monitor can hold an
/// `Arc<dyn Backend>` without knowing the concrete driver.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Checks if the backend is reachable (a ping).
    async fn health_check(&self) -> Result<(), BackendError>;

    /// Drops the current connection state and establishes a fresh one.
    async fn reconnect(&self) -> Result<(), BackendError>;

    /// Creates indexes or other schema objects if needed.
    async fn initialize(&self) -> Result<(), BackendError>;
}

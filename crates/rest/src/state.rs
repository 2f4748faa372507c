//! Application state for the address book API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the record service, configuration, the health monitor's
//! status handle and the counters reported by `/status`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use addressbook_persistence::RecordService;
use addressbook_persistence::core::RecordStorage;
use addressbook_persistence::health::HealthStatusHandle;
use chrono::{DateTime, Utc};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use addressbook_rest::{AppState, ServerConfig};
/// use addressbook_persistence::backends::memory::MemoryBackend;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
/// ```
pub struct AppState<S> {
    /// The record service.
    service: RecordService<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Datastore connection status.
    health: HealthStatusHandle,

    /// Process start time.
    started: DateTime<Utc>,

    /// Requests served since start.
    requests: Arc<AtomicU64>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            config: Arc::clone(&self.config),
            health: self.health.clone(),
            started: self.started,
            requests: Arc::clone(&self.requests),
        }
    }
}

impl<S: RecordStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    ///
    /// The health handle starts detached; use [`with_health`](Self::with_health)
    /// to attach a running monitor.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            service: RecordService::new(storage),
            config: Arc::new(config),
            health: HealthStatusHandle::default(),
            started: Utc::now(),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Attaches a health monitor's status handle.
    pub fn with_health(mut self, health: HealthStatusHandle) -> Self {
        self.health = health;
        self
    }

    /// Returns the record service.
    pub fn service(&self) -> &RecordService<S> {
        &self.service
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the datastore connection status handle.
    pub fn health(&self) -> &HealthStatusHandle {
        &self.health
    }

    /// Returns when the state was created.
    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    /// Counts one served request.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of requests served.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

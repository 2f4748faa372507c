//! Connection health monitoring.
//!
//! The [`HealthMonitor`] pings the datastore on a fixed interval. A failed
//! ping marks the connection [`ConnectionStatus::Degraded`], asks the backend
//! to reconnect, and retries after a short backoff until a ping succeeds.
//! Request handlers read the current state through a [`HealthStatusHandle`]
//! and are never blocked by the monitor.
//!
//! # Example
//!
//! ```ignore
//! use addressbook_persistence::health::{HealthConfig, HealthMonitor};
//!
//! let mut monitor = HealthMonitor::new(HealthConfig::default());
//! let status = monitor.status_handle();
//! let task = monitor.start(backend.clone());
//!
//! // ... serve requests, reading status.status() ...
//!
//! monitor.stop().await;
//! task.await?;
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::core::Backend;

/// Observed state of the datastore connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The last probe failed; reconnection is in progress.
    Degraded,
    /// The last probe succeeded.
    Healthy,
}

impl ConnectionStatus {
    /// Numeric code used by the status report.
    pub fn code(&self) -> u8 {
        match self {
            ConnectionStatus::Unknown => 0,
            ConnectionStatus::Degraded => 1,
            ConnectionStatus::Healthy => 2,
        }
    }

    /// Human readable description used by the status report.
    pub fn description(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Unknown",
            ConnectionStatus::Degraded => "Have some problems",
            ConnectionStatus::Healthy => "Running",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "unknown"),
            ConnectionStatus::Degraded => write!(f, "degraded"),
            ConnectionStatus::Healthy => write!(f, "healthy"),
        }
    }
}

/// Health monitor timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Time between probes while healthy.
    #[serde(with = "humantime_serde", default = "default_check_interval")]
    pub check_interval: Duration,

    /// Time between probes while degraded.
    #[serde(with = "humantime_serde", default = "default_retry_backoff")]
    pub retry_backoff: Duration,

    /// Upper bound on a single ping.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_check_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_retry_backoff() -> Duration {
    Duration::from_secs(1)
}

fn default_timeout() -> Duration {
    Duration::from_secs(3)
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            retry_backoff: default_retry_backoff(),
            timeout: default_timeout(),
        }
    }
}

/// Serde module for Duration with humantime format.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// Point-in-time view of the connection state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthSnapshot {
    /// Current status.
    pub status: ConnectionStatus,
    /// Error from the most recent failed probe, cleared on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// When the most recent probe finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
    /// Failed probes since the last success.
    pub consecutive_failures: u32,
}

impl HealthSnapshot {
    fn record_success(&mut self, backend: &str) {
        if self.status == ConnectionStatus::Degraded {
            info!(
                backend,
                failures = self.consecutive_failures,
                "Connection to datastore restored"
            );
        }
        self.status = ConnectionStatus::Healthy;
        self.last_error = None;
        self.last_checked = Some(Utc::now());
        self.consecutive_failures = 0;
    }

    fn record_failure(&mut self, backend: &str, error: String) {
        if self.status != ConnectionStatus::Degraded {
            warn!(backend, error = %error, "Lost connection to datastore, trying to reconnect");
        } else {
            debug!(backend, error = %error, "Datastore still unreachable");
        }
        self.status = ConnectionStatus::Degraded;
        self.last_error = Some(error);
        self.last_checked = Some(Utc::now());
        self.consecutive_failures += 1;
    }
}

/// Read-only, cloneable view of the monitor's state.
#[derive(Debug, Clone, Default)]
pub struct HealthStatusHandle {
    state: Arc<RwLock<HealthSnapshot>>,
}

impl HealthStatusHandle {
    /// Returns the current status.
    pub fn status(&self) -> ConnectionStatus {
        self.state.read().status
    }

    /// Returns a copy of the full state.
    pub fn snapshot(&self) -> HealthSnapshot {
        self.state.read().clone()
    }

    /// Returns `true` while the connection is degraded.
    pub fn is_degraded(&self) -> bool {
        self.status() == ConnectionStatus::Degraded
    }
}

/// Background prober for the datastore connection.
pub struct HealthMonitor {
    /// Configuration.
    config: HealthConfig,

    /// Shared connection state.
    state: Arc<RwLock<HealthSnapshot>>,

    /// Shutdown channel.
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl HealthMonitor {
    /// Creates a new health monitor.
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(HealthSnapshot::default())),
            shutdown_tx: None,
        }
    }

    /// Returns a handle for reading the monitor's state.
    pub fn status_handle(&self) -> HealthStatusHandle {
        HealthStatusHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Starts background probing of `backend`.
    ///
    /// The task runs until [`stop`](Self::stop) is called or the monitor is
    /// dropped.
    pub fn start(&mut self, backend: Arc<dyn Backend>) -> tokio::task::JoinHandle<()> {
        let (tx, rx) = mpsc::channel(1);
        self.shutdown_tx = Some(tx);

        let config = self.config.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            Self::health_check_loop(rx, backend, config, state).await;
        })
    }

    /// Stops the health monitor.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
    }

    /// Performs a single bounded ping.
    pub async fn check_backend(backend: &dyn Backend, timeout: Duration) -> Result<(), String> {
        match tokio::time::timeout(timeout, backend.health_check()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("health check timed out after {:?}", timeout)),
        }
    }

    /// Background health check loop.
    async fn health_check_loop(
        mut shutdown_rx: mpsc::Receiver<()>,
        backend: Arc<dyn Backend>,
        config: HealthConfig,
        state: Arc<RwLock<HealthSnapshot>>,
    ) {
        let name = backend.name();
        let mut interval = tokio::time::interval(config.check_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Health monitor shutting down");
                    return;
                }
                _ = interval.tick() => {}
            }

            // Retry with backoff until a ping succeeds.
            loop {
                match Self::check_backend(backend.as_ref(), config.timeout).await {
                    Ok(()) => {
                        state.write().record_success(name);
                        break;
                    }
                    Err(error) => {
                        state.write().record_failure(name, error);
                        if let Err(e) = backend.reconnect().await {
                            debug!(backend = name, error = %e, "Reconnect attempt failed");
                        }
                    }
                }

                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!("Health monitor shutting down");
                        return;
                    }
                    _ = tokio::time::sleep(config.retry_backoff) => {}
                }
            }
        }
    }
}

//! In-process backend.
//!
//! Keeps records in a vector guarded by a lock, in insertion order, with the
//! same unique-key rules as the MongoDB backend's indexes. Useful for local runs and
//! tests; an outage can be simulated with [`MemoryBackend::set_available`].

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::{Backend, BackendKind, RecordStorage};
use crate::error::{
    BackendError, ConflictKey, RecordError, StorageError, StorageResult, ValidationError,
};
use crate::types::{Record, RecordId, UniqueField};

const BACKEND_NAME: &str = "memory";

/// Configuration for the in-process backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBackendConfig {
    /// Reject writes that would give two records the same non-empty e-mail
    /// or phone number.
    #[serde(default = "default_true")]
    pub unique_keys: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MemoryBackendConfig {
    fn default() -> Self {
        Self { unique_keys: true }
    }
}

/// In-process record store.
pub struct MemoryBackend {
    records: RwLock<Vec<Record>>,
    config: MemoryBackendConfig,
    available: AtomicBool,
    reconnects: AtomicU32,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("config", &self.config)
            .field("records", &self.records.read().len())
            .field("available", &self.available.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty backend with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryBackendConfig::default())
    }

    /// Creates an empty backend with custom configuration.
    pub fn with_config(config: MemoryBackendConfig) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            config,
            available: AtomicBool::new(true),
            reconnects: AtomicU32::new(0),
        }
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MemoryBackendConfig {
        &self.config
    }

    /// Simulates the datastore going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of times [`Backend::reconnect`] has been called.
    pub fn reconnect_count(&self) -> u32 {
        self.reconnects.load(Ordering::SeqCst)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: "datastore is offline".to_string(),
            })
        }
    }

    fn check_unique_keys(&self, records: &[Record], record: &Record) -> StorageResult<()> {
        if !self.config.unique_keys {
            return Ok(());
        }
        for field in UniqueField::ALL {
            let value = record.unique_value(field);
            if value.is_empty() {
                continue;
            }
            let taken = records
                .iter()
                .any(|r| r.id != record.id && r.unique_value(field) == value);
            if taken {
                return Err(RecordError::AlreadyExists { key: field.into() }.into());
            }
        }
        Ok(())
    }
}

fn require_id(record: &Record) -> StorageResult<RecordId> {
    record.id.ok_or_else(|| {
        StorageError::Validation(ValidationError::InvalidIdentifier {
            value: String::new(),
        })
    })
}

#[async_trait]
impl RecordStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert(&self, record: &Record) -> StorageResult<()> {
        self.ensure_available()?;
        let id = require_id(record)?;
        let mut records = self.records.write();

        if records.iter().any(|r| r.id == Some(id)) {
            return Err(RecordError::AlreadyExists { key: ConflictKey::Id }.into());
        }
        self.check_unique_keys(&records, record)?;

        records.push(record.clone());
        Ok(())
    }

    async fn upsert(&self, record: &Record) -> StorageResult<bool> {
        self.ensure_available()?;
        let id = require_id(record)?;
        let mut records = self.records.write();
        self.check_unique_keys(&records, record)?;

        match records.iter_mut().find(|r| r.id == Some(id)) {
            Some(existing) => {
                *existing = record.clone();
                Ok(false)
            }
            None => {
                records.push(record.clone());
                Ok(true)
            }
        }
    }

    async fn replace(&self, record: &Record) -> StorageResult<()> {
        self.ensure_available()?;
        let id = require_id(record)?;
        let mut records = self.records.write();

        let Some(index) = records.iter().position(|r| r.id == Some(id)) else {
            return Err(RecordError::NotFound { id: id.to_hex() }.into());
        };
        self.check_unique_keys(&records, record)?;

        records[index] = record.clone();
        Ok(())
    }

    async fn find(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        self.ensure_available()?;
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.id.as_ref() == Some(id))
            .cloned())
    }

    async fn exists_by(&self, field: UniqueField, value: &str) -> StorageResult<bool> {
        self.ensure_available()?;
        Ok(self
            .records
            .read()
            .iter()
            .any(|r| r.unique_value(field) == value))
    }

    async fn delete(&self, id: &RecordId) -> StorageResult<()> {
        self.ensure_available()?;
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id.as_ref() != Some(id));

        if records.len() == before {
            return Err(RecordError::NotFound { id: id.to_hex() }.into());
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Record>> {
        self.ensure_available()?;
        Ok(self.records.read().clone())
    }

    async fn clear(&self) -> StorageResult<u64> {
        self.ensure_available()?;
        let mut records = self.records.write();
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.ensure_available()
    }

    async fn reconnect(&self) -> Result<(), BackendError> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

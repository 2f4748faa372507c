//! The record service.
//!
//! [`RecordService`] owns the business rules around the contact collection:
//! validation before writes, uniqueness on create, and the CSV import/export
//! flows. It is constructed once at startup and shared with request handlers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bulk::{ImportMode, ImportSummary, parse_csv, rows_to_records, write_csv};
use crate::core::RecordStorage;
use crate::error::{ImportError, RecordError, StorageResult, ValidationError};
use crate::types::{Record, RecordId, RecordInput, UniqueField};
use crate::validation::validate;

/// Contact operations on top of a [`RecordStorage`].
pub struct RecordService<S> {
    storage: Arc<S>,
}

impl<S> Clone for RecordService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: RecordStorage> RecordService<S> {
    /// Creates a service over the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Validates and stores a new contact, returning its assigned id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation(InvalidRecord)` - If any field check fails
    /// * `StorageError::Record(AlreadyExists)` - If the phone or e-mail is taken
    pub async fn create(&self, input: RecordInput) -> StorageResult<RecordId> {
        let record = input.into_record();
        ensure_valid(&record)?;

        for field in UniqueField::ALL {
            let value = record.unique_value(field);
            if !value.is_empty() && self.storage.exists_by(field, value).await? {
                debug!(field = %field, "Create rejected, key already in use");
                return Err(RecordError::AlreadyExists { key: field.into() }.into());
            }
        }

        let id = RecordId::new();
        self.storage.insert(&record.with_id(id)).await?;
        info!(id = %id, "User created");
        Ok(id)
    }

    /// Inserts a record as-is, without validation or uniqueness checks.
    pub async fn upload_raw(&self, record: &Record) -> StorageResult<()> {
        self.storage.insert(record).await
    }

    /// Inserts a record, or replaces the one with the same id.
    ///
    /// Returns `true` if a new record was created.
    pub async fn upsert(&self, record: &Record) -> StorageResult<bool> {
        self.storage.upsert(record).await
    }

    /// Replaces the mutable fields of an existing contact.
    ///
    /// Uniqueness is not re-checked here; with unique indexes enabled a
    /// collision is still rejected by the datastore.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation(InvalidRecord)` - If any field check fails
    /// * `StorageError::Record(NotFound)` - If no record has the id
    pub async fn update(&self, id: RecordId, input: RecordInput) -> StorageResult<Record> {
        let record = input.into_record().with_id(id);
        ensure_valid(&record)?;

        self.storage.replace(&record).await?;
        info!(id = %id, "User updated");
        Ok(record)
    }

    /// Removes a contact.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - If no record has the id
    pub async fn delete(&self, id: &RecordId) -> StorageResult<()> {
        self.storage.delete(id).await?;
        info!(id = %id, "User deleted");
        Ok(())
    }

    /// Fetches a contact.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - If no record has the id
    pub async fn get(&self, id: &RecordId) -> StorageResult<Record> {
        self.storage
            .find(id)
            .await?
            .ok_or_else(|| RecordError::NotFound { id: id.to_hex() }.into())
    }

    /// Returns every contact.
    pub async fn list(&self) -> StorageResult<Vec<Record>> {
        self.storage.list().await
    }

    /// Removes every contact, returning how many were removed.
    pub async fn clear_all(&self) -> StorageResult<u64> {
        let removed = self.storage.clear().await?;
        info!(removed, "All users removed");
        Ok(removed)
    }

    /// Imports a CSV body.
    ///
    /// Malformed, short or invalid rows are skipped. In [`ImportMode::Clear`]
    /// the collection is emptied first and rows are then inserted as in
    /// [`ImportMode::Append`]; [`ImportMode::Upsert`] inserts or replaces by id.
    /// Writes stop at the first failure and earlier writes stay in place.
    ///
    /// # Errors
    ///
    /// * `StorageError::Import(EmptyInput)` - If the body is empty
    /// * `StorageError::Import(Parse)` - If the body is not CSV
    /// * `StorageError::Import(Aborted)` - If a write failed; reports how many
    ///   records were applied before it
    /// * Any error from clearing the collection in clear mode
    pub async fn import(&self, body: &[u8], mode: ImportMode) -> StorageResult<ImportSummary> {
        let rows = parse_csv(body)?;
        let total = rows.len();
        let (records, skipped) = rows_to_records(rows);

        if mode == ImportMode::Clear {
            self.clear_all().await?;
        }

        let mut applied = 0;
        for (row, record) in &records {
            let result = match mode {
                ImportMode::Clear | ImportMode::Append => self.upload_raw(record).await,
                ImportMode::Upsert => self.upsert(record).await.map(|_| ()),
            };

            if let Err(e) = result {
                warn!(row, applied, error = %e, "Import aborted");
                return Err(ImportError::Aborted {
                    applied,
                    row: *row,
                    source: Box::new(e),
                }
                .into());
            }
            applied += 1;
        }

        info!(mode = %mode, rows = total, skipped, applied, "Import finished");
        Ok(ImportSummary {
            mode,
            rows: total,
            skipped,
            applied,
        })
    }

    /// Renders every contact as CSV.
    ///
    /// # Errors
    ///
    /// * `StorageError::Export(Empty)` - If there are no contacts
    pub async fn export(&self) -> StorageResult<Vec<u8>> {
        let records = self.storage.list().await?;
        let csv = write_csv(&records)?;
        debug!(records = records.len(), bytes = csv.len(), "Export rendered");
        Ok(csv)
    }
}

fn ensure_valid(record: &Record) -> StorageResult<()> {
    let violations = validate(record);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidRecord { violations }.into())
    }
}

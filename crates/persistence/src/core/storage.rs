//! Core record storage trait.
//!
//! This module defines the [`RecordStorage`] trait, the small set of document
//! operations the record service is built on. Backends translate each call
//! into one datastore round trip.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Record, RecordId, UniqueField};

/// Document operations on the contact collection.
///
/// Every method is a single round trip; the trait carries no business rules.
/// Validation and uniqueness checks live in [`RecordService`](crate::RecordService).
///
/// # Example
///
/// ```ignore
/// use addressbook_persistence::core::RecordStorage;
/// use addressbook_persistence::types::{Record, RecordId};
///
/// async fn example<S: RecordStorage>(storage: &S) -> StorageResult<()> {
///     let record = Record::new("John", "Doe", "john@example.com", "555").with_id(RecordId::new());
///     storage.insert(&record).await?;
///
///     let found = storage.find(&record.id.unwrap()).await?;
///     assert!(found.is_some());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new document.
    ///
    /// The record must carry an id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation(InvalidIdentifier)` - If the record has no id
    /// * `StorageError::Record(AlreadyExists)` - If the id or a unique index collides
    async fn insert(&self, record: &Record) -> StorageResult<()>;

    /// Inserts the document, or replaces the document with the same id.
    ///
    /// # Returns
    ///
    /// `true` if a new document was created, `false` if one was replaced.
    async fn upsert(&self, record: &Record) -> StorageResult<bool>;

    /// Replaces the document with the record's id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - If no document has that id
    /// * `StorageError::Record(AlreadyExists)` - If a unique index rejects the new values
    async fn replace(&self, record: &Record) -> StorageResult<()>;

    /// Fetches a document by id.
    async fn find(&self, id: &RecordId) -> StorageResult<Option<Record>>;

    /// Returns `true` if any document has `value` in the given field.
    async fn exists_by(&self, field: UniqueField, value: &str) -> StorageResult<bool>;

    /// Removes the document with the given id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - If no document has that id
    async fn delete(&self, id: &RecordId) -> StorageResult<()>;

    /// Returns every document in natural (insertion) order.
    async fn list(&self) -> StorageResult<Vec<Record>>;

    /// Removes every document, returning how many were removed.
    async fn clear(&self) -> StorageResult<u64>;

    /// Checks if a document with the given id exists.
    async fn exists(&self, id: &RecordId) -> StorageResult<bool> {
        Ok(self.find(id).await?.is_some())
    }
}

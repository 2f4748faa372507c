//! RecordStorage implementation for MongoDB.

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;

use crate::core::RecordStorage;
use crate::error::{RecordError, StorageError, StorageResult, ValidationError};
use crate::types::{Record, RecordId, UniqueField};

use super::BACKEND_NAME;
use super::backend::MongoBackend;
use super::document::UserDocument;

fn document_for(record: &Record) -> StorageResult<UserDocument> {
    let id = record.id.ok_or_else(|| {
        StorageError::Validation(ValidationError::InvalidIdentifier {
            value: String::new(),
        })
    })?;
    Ok(UserDocument::from_record(id, record))
}

#[async_trait]
impl RecordStorage for MongoBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert(&self, record: &Record) -> StorageResult<()> {
        let document = document_for(record)?;
        self.collection().insert_one(&document).await?;
        Ok(())
    }

    async fn upsert(&self, record: &Record) -> StorageResult<bool> {
        let document = document_for(record)?;
        let result = self
            .collection()
            .replace_one(doc! { "_id": document.id }, &document)
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    async fn replace(&self, record: &Record) -> StorageResult<()> {
        let document = document_for(record)?;
        let result = self
            .collection()
            .replace_one(doc! { "_id": document.id }, &document)
            .await?;

        if result.matched_count == 0 {
            return Err(RecordError::NotFound {
                id: document.id.to_hex(),
            }
            .into());
        }
        Ok(())
    }

    async fn find(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        let found = self
            .collection()
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(found.map(Record::from))
    }

    async fn exists_by(&self, field: UniqueField, value: &str) -> StorageResult<bool> {
        let count = self
            .collection()
            .count_documents(doc! { field.as_str(): value })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: &RecordId) -> StorageResult<()> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;

        if result.deleted_count == 0 {
            return Err(RecordError::NotFound { id: id.to_hex() }.into());
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Record>> {
        let cursor = self.collection().find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Record::from).collect())
    }

    async fn clear(&self) -> StorageResult<u64> {
        let result = self.collection().delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}

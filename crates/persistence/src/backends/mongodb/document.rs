//! BSON shape of a stored contact.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::types::{Record, RecordId};

/// A contact as stored in the collection.
///
/// Empty strings are not written, matching documents created by earlier
/// versions of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

impl UserDocument {
    pub fn from_record(id: RecordId, record: &Record) -> Self {
        Self {
            id: id.as_object_id(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
        }
    }
}

impl From<UserDocument> for Record {
    fn from(doc: UserDocument) -> Self {
        Record {
            id: Some(RecordId::from(doc.id)),
            first_name: doc.first_name,
            last_name: doc.last_name,
            email: doc.email,
            phone: doc.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_not_written() {
        let id = RecordId::new();
        let record = Record::new("John", "Doe", "", "");
        let doc = bson::to_document(&UserDocument::from_record(id, &record)).unwrap();

        assert_eq!(doc.get_object_id("_id").unwrap(), id.as_object_id());
        assert_eq!(doc.get_str("first_name").unwrap(), "John");
        assert!(!doc.contains_key("email"));
        assert!(!doc.contains_key("phone"));
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let oid = ObjectId::new();
        let doc: UserDocument =
            bson::from_document(bson::doc! { "_id": oid, "email": "a@b" }).unwrap();
        let record = Record::from(doc);

        assert_eq!(record.id, Some(RecordId::from(oid)));
        assert_eq!(record.email, "a@b");
        assert_eq!(record.first_name, "");
    }
}

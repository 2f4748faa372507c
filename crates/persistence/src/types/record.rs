//! The contact record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RecordId;

/// A contact record.
///
/// `id` is `None` only before the record has been persisted. Empty string
/// fields are left out of the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Datastore identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Given name, ASCII letters only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,

    /// Family name, ASCII letters only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,

    /// E-mail address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    /// Free-form phone number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

impl Record {
    /// Creates an unsaved record from its four fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the value of one of the unique secondary keys.
    pub fn unique_value(&self, field: UniqueField) -> &str {
        match field {
            UniqueField::Email => &self.email,
            UniqueField::Phone => &self.phone,
        }
    }
}

/// The client-supplied part of a record.
///
/// Create and update bodies deserialize into this type; an `id` in the body is
/// ignored because identifiers are assigned by the service or taken from the
/// URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// E-mail address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl RecordInput {
    /// Builds an unsaved record from the input.
    pub fn into_record(self) -> Record {
        Record::new(self.first_name, self.last_name, self.email, self.phone)
    }
}

impl From<RecordInput> for Record {
    fn from(input: RecordInput) -> Self {
        input.into_record()
    }
}

/// The secondary keys that identify a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    /// The `email` field.
    Email,
    /// The `phone` field.
    Phone,
}

impl UniqueField {
    /// Every unique field, in the order create checks them.
    pub const ALL: [UniqueField; 2] = [UniqueField::Phone, UniqueField::Email];

    /// The field name as stored in the datastore.
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_fields_are_omitted() {
        let record = Record::new("John", "", "john@example.com", "");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"first_name": "John", "email": "john@example.com"})
        );
    }

    #[test]
    fn test_id_serialized_as_hex() {
        let id = RecordId::parse("5c8a1d5b0190b214360dc031").unwrap();
        let record = Record::new("John", "Doe", "john@example.com", "555").with_id(id);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "5c8a1d5b0190b214360dc031");
        assert_eq!(value["phone"], "555");
    }

    #[test]
    fn test_input_ignores_id_and_defaults_missing_fields() {
        let input: RecordInput = serde_json::from_value(json!({
            "id": "5c8a1d5b0190b214360dc031",
            "first_name": "Jane",
            "email": "jane@example.com"
        }))
        .unwrap();

        let record = input.into_record();
        assert!(record.id.is_none());
        assert_eq!(record.first_name, "Jane");
        assert_eq!(record.last_name, "");
        assert_eq!(record.phone, "");
    }

    #[test]
    fn test_unique_value() {
        let record = Record::new("A", "B", "a@b.c", "123");
        assert_eq!(record.unique_value(UniqueField::Email), "a@b.c");
        assert_eq!(record.unique_value(UniqueField::Phone), "123");
        assert_eq!(UniqueField::Phone.to_string(), "phone");
    }
}

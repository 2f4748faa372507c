//! Record identifiers.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// The identifier of a stored record.
///
/// Wraps the document database's 12-byte object id. Its canonical text form,
/// used in URLs, JSON bodies and CSV files, is 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generates a fresh, globally unique identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the canonical hex form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] if `value` is not exactly
    /// 24 hex characters.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidIdentifier {
                value: value.to_string(),
            })
    }

    /// Returns the underlying object id.
    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }

    /// Returns the canonical hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

// JSON carries the hex string, never the extended-JSON `{"$oid": ...}` form.
impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_hex() {
        let id = RecordId::parse("5c8a1d5b0190b214360dc031").unwrap();
        assert_eq!(id.to_string(), "5c8a1d5b0190b214360dc031");
    }

    #[test]
    fn test_parse_uppercase_normalizes() {
        let id: RecordId = "5C8A1D5B0190B214360DC031".parse().unwrap();
        assert_eq!(id.to_hex(), "5c8a1d5b0190b214360dc031");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in [
            "",
            "abc",
            "5c8a1d5b0190b214360dc03",
            "zz8a1d5b0190b214360dc031",
            "5c8a1d5b0190b214360dc0311",
        ] {
            let err = RecordId::parse(bad).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidIdentifier { .. }), "{bad}");
        }
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_json_form_is_hex_string() {
        let id = RecordId::parse("5c8a1d5b0190b214360dc031").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("5c8a1d5b0190b214360dc031"));

        let back: RecordId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_value::<RecordId>(serde_json::json!("nope")).is_err());
    }
}

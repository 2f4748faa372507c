//! Record validation.
//!
//! A record is valid when its e-mail matches the address pattern and both
//! names are non-empty runs of ASCII letters. Every check runs on every call
//! so clients see all problems at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::Record;

// Local part accepts both the ASCII apostrophe and U+2019.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'\x{2019}*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("email pattern is valid")
});

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("name pattern is valid"));

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The offending field.
    pub field: &'static str,
    /// Client-facing message.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Checks a record, returning every violation found.
///
/// The order is fixed: email, first name, last name. An empty result means
/// the record is valid. The phone number is not checked.
pub fn validate(record: &Record) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !is_valid_email(&record.email) {
        violations.push(Violation::new("email", "email is incorrect"));
    }
    if !is_valid_name(&record.first_name) {
        violations.push(Violation::new("first_name", "first name is incorrect"));
    }
    if !is_valid_name(&record.last_name) {
        violations.push(Violation::new("last_name", "last name is incorrect"));
    }

    violations
}

/// Returns `true` if `email` matches the address pattern.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Returns `true` if `name` is one or more ASCII letters.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(record: &Record) -> Vec<String> {
        validate(record).into_iter().map(|v| v.message).collect()
    }

    #[test]
    fn test_valid_record() {
        let record = Record::new("John", "Doe", "john.doe@example.com", "");
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let record = Record::new("J0hn", "", "not-an-email", "123");
        assert_eq!(
            messages(&record),
            vec![
                "email is incorrect",
                "first name is incorrect",
                "last name is incorrect"
            ]
        );
    }

    #[test]
    fn test_single_violation() {
        let record = Record::new("John", "Doe", "bad", "");
        assert_eq!(messages(&record), vec!["email is incorrect"]);
        assert_eq!(validate(&record)[0].field, "email");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b"));
        assert!(is_valid_email("first.last+tag@mail-server.example.org"));
        assert!(is_valid_email("o'brien@example.com"));
        assert!(is_valid_email("o\u{2019}brien@example.com"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("john@exa_mple.com"));
        assert!(!is_valid_email("john@example..com"));
        assert!(!is_valid_email("john doe@example.com"));
    }

    #[test]
    fn test_name_pattern() {
        assert!(is_valid_name("Ann"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Anne-Marie"));
        assert!(!is_valid_name("José"));
        assert!(!is_valid_name("Ann "));
    }
}

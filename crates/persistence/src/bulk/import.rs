//! CSV import parsing.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::ImportError;
use crate::types::{Record, RecordId};
use crate::validation::validate;

use super::CSV_COLUMNS;

/// How imported rows are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Remove every record, then insert each row.
    Clear,
    /// Insert each row as a new document.
    Append,
    /// Insert or replace by id.
    #[default]
    Upsert,
}

impl ImportMode {
    /// Picks the mode from the `Append-type` header value.
    ///
    /// Only the exact values `"clear"` and `"append"` select those modes;
    /// anything else, including a missing header or a differently cased value,
    /// selects [`ImportMode::Upsert`].
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("clear") => ImportMode::Clear,
            Some("append") => ImportMode::Append,
            _ => ImportMode::Upsert,
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Clear => write!(f, "clear"),
            ImportMode::Append => write!(f, "append"),
            ImportMode::Upsert => write!(f, "upsert"),
        }
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Mode used.
    pub mode: ImportMode,
    /// Rows read from the body.
    pub rows: usize,
    /// Rows skipped for shape, id or validation problems.
    pub skipped: usize,
    /// Records written.
    pub applied: usize,
}

/// Splits a CSV body into rows of fields.
///
/// Rows may have any number of fields; shape checks happen in
/// [`rows_to_records`].
///
/// # Errors
///
/// * `ImportError::EmptyInput` - If the body has no bytes
/// * `ImportError::Parse` - If the body is not well-formed CSV
pub fn parse_csv(body: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    if body.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Converts parsed rows into records, skipping rows that cannot be stored.
///
/// A row is skipped when it does not have exactly five fields, when its id is
/// not a valid identifier, or when the record fails validation.
///
/// # Returns
///
/// The surviving records in row order, each paired with its 1-based row
/// number, and the number of skipped rows.
pub fn rows_to_records(rows: Vec<Vec<String>>) -> (Vec<(usize, Record)>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.into_iter().enumerate() {
        let line = index + 1;
        match row_to_record(row) {
            Some(record) => records.push((line, record)),
            None => {
                debug!(row = line, "Skipping CSV row");
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

fn row_to_record(row: Vec<String>) -> Option<Record> {
    let [id, first_name, last_name, email, phone]: [String; CSV_COLUMNS] = row.try_into().ok()?;
    let id = RecordId::parse(id.trim()).ok()?;
    let record = Record::new(first_name, last_name, email, phone).with_id(id);

    validate(&record).is_empty().then_some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "5c8a1d5b0190b214360dc031";
    const ID_B: &str = "5c8a1d5b0190b214360dc032";

    #[test]
    fn test_mode_from_header() {
        assert_eq!(ImportMode::from_header(Some("clear")), ImportMode::Clear);
        assert_eq!(ImportMode::from_header(Some("append")), ImportMode::Append);
        assert_eq!(ImportMode::from_header(Some("upsert")), ImportMode::Upsert);
        assert_eq!(ImportMode::from_header(None), ImportMode::Upsert);
    }

    #[test]
    fn test_mode_from_header_is_exact() {
        assert_eq!(ImportMode::from_header(Some("Clear")), ImportMode::Upsert);
        assert_eq!(ImportMode::from_header(Some("CLEAR")), ImportMode::Upsert);
        assert_eq!(ImportMode::from_header(Some(" clear ")), ImportMode::Upsert);
        assert_eq!(ImportMode::from_header(Some("Append")), ImportMode::Upsert);
        assert_eq!(ImportMode::from_header(Some("whatever")), ImportMode::Upsert);
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(matches!(parse_csv(b""), Err(ImportError::EmptyInput)));
    }

    #[test]
    fn test_parse_flexible_rows() {
        let body = format!("{ID_A},John,Doe,john@example.com,555\nonly,three,fields\n");
        let rows = parse_csv(body.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 5);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let body = format!("{ID_A},John,Doe,john@example.com,\"+1 (555) 0100, ext 2\"\n");
        let rows = parse_csv(body.as_bytes()).unwrap();
        assert_eq!(rows[0][4], "+1 (555) 0100, ext 2");
    }

    #[test]
    fn test_parse_malformed() {
        let body = b"a,\"unterminated\xff";
        assert!(matches!(parse_csv(body), Err(ImportError::Parse { .. })));
    }

    #[test]
    fn test_rows_to_records_skips_bad_rows() {
        let rows = vec![
            vec![ID_A.into(), "John".into(), "Doe".into(), "john@example.com".into(), "1".into()],
            vec![ID_B.into(), "Jane".into(), "Doe".into()],
            vec![
                "not-an-id".into(),
                "Bob".into(),
                "Roe".into(),
                "bob@example.com".into(),
                "2".into(),
            ],
            vec![ID_B.into(), "J4ne".into(), "Doe".into(), "jane@example.com".into(), "3".into()],
            vec![ID_B.into(), "Jane".into(), "Doe".into(), "jane@example.com".into(), "3".into()],
        ];

        let (records, skipped) = rows_to_records(rows);
        assert_eq!(skipped, 3);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[0].1.id.unwrap().to_hex(), ID_A);
        assert_eq!(records[1].0, 5);
        assert_eq!(records[1].1.first_name, "Jane");
    }
}

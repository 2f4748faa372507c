//! CSV export.

use crate::error::ExportError;
use crate::types::Record;

/// Serializes records as headerless CSV, one row per record.
///
/// # Errors
///
/// * `ExportError::Empty` - If there are no records
/// * `ExportError::WriteError` - If the CSV writer fails
pub fn write_csv(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for record in records {
        let id = record.id.map(|id| id.to_hex()).unwrap_or_default();
        writer.write_record([
            id.as_str(),
            record.first_name.as_str(),
            record.last_name.as_str(),
            record.email.as_str(),
            record.phone.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::{parse_csv, rows_to_records};
    use crate::types::RecordId;

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(write_csv(&[]), Err(ExportError::Empty)));
    }

    #[test]
    fn test_row_layout() {
        let id = RecordId::parse("5c8a1d5b0190b214360dc031").unwrap();
        let records = vec![Record::new("John", "Doe", "john@example.com", "555").with_id(id)];

        let csv = String::from_utf8(write_csv(&records).unwrap()).unwrap();
        assert_eq!(csv, "5c8a1d5b0190b214360dc031,John,Doe,john@example.com,555\n");
    }

    #[test]
    fn test_export_is_importable() {
        let records = vec![
            Record::new("John", "Doe", "john@example.com", "+1 555, ext 2")
                .with_id(RecordId::new()),
            Record::new("Jane", "Roe", "jane@example.com", "").with_id(RecordId::new()),
        ];

        let bytes = write_csv(&records).unwrap();
        let (back, skipped) = rows_to_records(parse_csv(&bytes).unwrap());
        assert_eq!(skipped, 0);
        let back: Vec<Record> = back.into_iter().map(|(_, r)| r).collect();
        assert_eq!(back, records);
    }
}

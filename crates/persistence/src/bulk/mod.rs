//! CSV bulk transfer.
//!
//! The CSV layout has no header row and five columns per line:
//!
//! ```text
//! id,first_name,last_name,email,phone
//! ```
//!
//! where `id` is the 24 character hex form of a [`RecordId`](crate::types::RecordId).
//! [`export`] writes this layout and [`import`] reads it back.

pub mod export;
pub mod import;

pub use export::write_csv;
pub use import::{ImportMode, ImportSummary, parse_csv, rows_to_records};

/// Number of columns in a CSV row.
pub const CSV_COLUMNS: usize = 5;

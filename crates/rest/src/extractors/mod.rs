//! Axum extractors for address book requests.
//!
//! - [`RecordIdPath`] - Parse the `{id}` path segment into a record id
//! - [`ContactBody`] - Decode a JSON contact from the request body
//! - [`CsvBody`] - Read a size-limited `text/csv` import body

mod contact_body;
mod csv_body;
mod record_id;

pub use contact_body::{ContactBody, ContactBodyRejection};
pub use csv_body::{CsvBody, is_csv};
pub use record_id::RecordIdPath;

//! HTTP request handlers.
//!
//! - [`create`] - Create a contact
//! - [`read`] - Read one contact, or list all of them
//! - [`update`] - Replace a contact's fields
//! - [`delete`] - Remove a contact
//! - [`bulk`] - CSV import and export, clearing the collection
//! - [`health`] - Health check and status report

pub mod bulk;
pub mod create;
pub mod delete;
pub mod health;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use bulk::{clear_handler, export_handler, import_handler};
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, status_handler};
pub use read::{list_handler, read_handler};
pub use update::update_handler;

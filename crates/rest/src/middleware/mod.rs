//! HTTP middleware for the address book API.
//!
//! - [`request_counter`] - Counts served requests for the status report
//! - [`request_id`] - `x-request-id` generation and propagation

pub mod request_counter;
pub mod request_id;

pub use request_counter::request_counter_middleware;
pub use request_id::X_REQUEST_ID;

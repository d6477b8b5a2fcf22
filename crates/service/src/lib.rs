//! Service layer for the quote web app.
//! - `quote` owns the in-memory corpus and random selection.
//! - Errors are reported through `ServiceError`.

pub mod errors;
pub mod quote;

pub use errors::ServiceError;
pub use quote::{Quote, QuoteStore};

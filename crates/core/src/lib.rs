//! Fintrack Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the Fintrack personal finance
//! backend. It is database-agnostic and defines the repository traits that
//! are implemented by the `storage-sqlite` crate, plus the collaborator
//! traits (bank data, payments, email, OCR) implemented by `connect`.

pub mod accounts;
pub mod amounts;
pub mod banking;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod imports;
pub mod notifications;
pub mod premium;
pub mod summary;
pub mod transactions;
pub mod unconfigured;
pub mod users;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

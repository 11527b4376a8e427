//! SQLite storage for email tokens and two-factor confirmations.

mod model;
mod repository;

pub use model::{AuthTokenDB, TwoFactorConfirmationDB};
pub use repository::AuthTokenRepository;

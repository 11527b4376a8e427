//! SQLite storage for premium entitlements and their payment orders.

mod model;
mod repository;

pub use model::{OrderDB, PremiumDB};
pub use repository::PremiumRepository;

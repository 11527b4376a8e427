//! SQLite storage implementation for transactions.

mod model;
mod repository;

pub use model::{TransactionChangesetDB, TransactionDB};
pub use repository::TransactionRepository;

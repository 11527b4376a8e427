//! SQLite storage implementation for categories.

mod model;
mod repository;

pub use model::CategoryDB;
pub use repository::CategoryRepository;

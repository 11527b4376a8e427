//! Transactions module - income and expense records, services, and traits.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter, TransactionInput,
    TransactionQuery, TransactionUpdate,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};

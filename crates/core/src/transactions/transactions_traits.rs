use async_trait::async_trait;
use chrono::NaiveDate;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter, TransactionInput,
    TransactionQuery, TransactionUpdate,
};
use crate::errors::Result;

/// Persistence contract for transactions.
///
/// Ownership is derived through the transaction's account: rows whose account
/// belongs to another user, or no longer exists, are invisible to the caller.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Inserts every row in one write; either all rows land or none do.
    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize>;

    /// Replaces the stored row with the given values.
    async fn update(&self, transaction: Transaction) -> Result<Transaction>;

    /// Returns the number of deleted records.
    async fn delete_many(&self, user_id: &str, transaction_ids: Vec<String>) -> Result<usize>;

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Date-descending listing with account/category names.
    fn search(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetails>>;

    /// All of the user's transactions dated within `[start, end]`.
    fn list_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<&str>,
    ) -> Result<Vec<Transaction>>;

    /// Most recent transaction date recorded on the account.
    fn latest_date(&self, user_id: &str, account_id: &str) -> Result<Option<NaiveDate>>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn create_transaction(&self, user_id: &str, input: TransactionInput)
        -> Result<Transaction>;

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()>;

    async fn delete_transactions(&self, user_id: &str, transaction_ids: Vec<String>)
        -> Result<usize>;

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;

    fn list_transactions(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> Result<Vec<TransactionDetails>>;
}

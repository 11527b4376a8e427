//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types. Every operation is scoped to the owning user:
//! an account that belongs to someone else behaves exactly like a missing one.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    async fn create(&self, user_id: &str, new_account: NewAccount) -> Result<Account>;

    /// Renames an account. Fails with a not-found error when the account
    /// does not belong to the user.
    async fn update(
        &self,
        user_id: &str,
        account_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account>;

    /// Stores the bank aggregator access token on the account.
    async fn set_plaid_id(&self, user_id: &str, account_id: &str, plaid_id: String)
        -> Result<Account>;

    /// Deletes the given accounts. Transactions are left in place.
    ///
    /// Returns the number of deleted records.
    async fn delete_many(&self, user_id: &str, account_ids: Vec<String>) -> Result<usize>;

    fn get_by_id(&self, user_id: &str, account_id: &str) -> Result<Option<Account>>;

    /// Lists the user's accounts, newest first, optionally filtered by a
    /// case-insensitive substring of name, plaid id or id.
    fn list(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Account>>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create_account(&self, user_id: &str, new_account: NewAccount) -> Result<Account>;

    async fn update_account(
        &self,
        user_id: &str,
        account_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account>;

    async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()>;

    /// Deletes every listed account the user owns and returns how many went.
    async fn delete_accounts(&self, user_id: &str, account_ids: Vec<String>) -> Result<usize>;

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account>;

    fn list_accounts(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Account>>;
}

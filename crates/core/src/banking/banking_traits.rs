use async_trait::async_trait;
use chrono::NaiveDate;

use super::banking_model::{
    BankAccount, BankLinkCredentials, BankSyncResult, BankTransaction, ConnectBankInput,
    LinkToken,
};
use crate::accounts::Account;
use crate::errors::Result;
use crate::users::AuthenticatedUser;

/// Bank data aggregator (link flow, accounts and transactions).
#[async_trait]
pub trait BankDataProviderTrait: Send + Sync {
    async fn create_link_token(&self, user_id: &str, client_name: &str) -> Result<LinkToken>;

    async fn exchange_public_token(&self, public_token: &str) -> Result<BankLinkCredentials>;

    async fn list_accounts(&self, access_token: &str) -> Result<Vec<BankAccount>>;

    async fn list_transactions(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BankTransaction>>;
}

#[async_trait]
pub trait BankingServiceTrait: Send + Sync {
    async fn create_link_token(&self, user: &AuthenticatedUser) -> Result<LinkToken>;

    /// Links a financial account to the bank behind `public_token`.
    async fn connect_account(&self, user_id: &str, input: ConnectBankInput) -> Result<Account>;

    async fn list_bank_accounts(&self, user_id: &str, account_id: &str)
        -> Result<Vec<BankAccount>>;

    /// Pulls bank transactions since the account's latest stored date.
    async fn sync_transactions(&self, user_id: &str, account_id: &str) -> Result<BankSyncResult>;
}

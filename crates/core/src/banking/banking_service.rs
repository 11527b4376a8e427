use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};

use super::banking_model::{
    BankAccount, BankSyncResult, BankTransaction, ConnectBankInput, LinkToken,
};
use super::banking_traits::{BankDataProviderTrait, BankingServiceTrait};
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::amounts::to_storage_units;
use crate::constants::BANK_SYNC_PAYEE;
use crate::errors::{Error, Result};
use crate::premium::PremiumServiceTrait;
use crate::transactions::{NewTransaction, TransactionRepositoryTrait};
use crate::users::AuthenticatedUser;
use crate::utils::time_utils;

pub struct BankingService {
    provider: Arc<dyn BankDataProviderTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    premium_service: Arc<dyn PremiumServiceTrait>,
}

impl BankingService {
    pub fn new(
        provider: Arc<dyn BankDataProviderTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        premium_service: Arc<dyn PremiumServiceTrait>,
    ) -> Self {
        Self {
            provider,
            account_repository,
            transaction_repository,
            premium_service,
        }
    }

    fn linked_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        self.premium_service.ensure_premium(user_id)?;
        self.account_repository
            .get_by_id(user_id, account_id)?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }

    /// Sync start: the latest stored transaction date, or the epoch.
    ///
    /// The start day itself is fetched again, and rows from it are only
    /// deduplicated within the new batch, not against stored history.
    fn sync_start(&self, user_id: &str, account_id: &str) -> Result<NaiveDate> {
        Ok(self
            .transaction_repository
            .latest_date(user_id, account_id)?
            .unwrap_or(NaiveDate::default()))
    }
}

/// Maps bank rows onto the account, dropping repeats of `(date, amount)`.
fn to_new_transactions(
    account_id: &str,
    bank_transactions: Vec<BankTransaction>,
) -> Result<(Vec<NewTransaction>, usize)> {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    let mut rows = Vec::with_capacity(bank_transactions.len());
    for bank_tx in bank_transactions {
        let amount = to_storage_units(bank_tx.amount)?;
        if !seen.insert((bank_tx.date, amount)) {
            duplicates += 1;
            continue;
        }
        rows.push(NewTransaction {
            financial_account_id: account_id.to_string(),
            category_id: None,
            amount,
            date: bank_tx.date,
            payee: BANK_SYNC_PAYEE.to_string(),
            notes: bank_tx.name.filter(|n| !n.trim().is_empty()),
        });
    }
    Ok((rows, duplicates))
}

#[async_trait]
impl BankingServiceTrait for BankingService {
    async fn create_link_token(&self, user: &AuthenticatedUser) -> Result<LinkToken> {
        let client_name = user
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::invalid("A name is required to link a bank"))?;

        self.provider
            .create_link_token(&user.id, client_name)
            .await
            .map_err(|err| {
                warn!("Link token creation failed for user {}: {}", user.id, err);
                Error::ExternalService("Error creating Plaid link token".to_string())
            })
    }

    async fn connect_account(&self, user_id: &str, input: ConnectBankInput) -> Result<Account> {
        input.validate()?;
        let account = self.linked_account(user_id, input.account_id.trim())?;

        let credentials = self
            .provider
            .exchange_public_token(input.public_token.trim())
            .await
            .map_err(|err| {
                warn!("Public token exchange failed for account {}: {}", account.id, err);
                Error::ExternalService("Error exchanging public token".to_string())
            })?;
        debug!("Linked account {} to bank item {}", account.id, credentials.item_id);

        self.account_repository
            .set_plaid_id(user_id, &account.id, credentials.access_token)
            .await
    }

    async fn list_bank_accounts(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<Vec<BankAccount>> {
        let account = self.linked_account(user_id, account_id)?;
        let Some(access_token) = account.plaid_id.as_deref().filter(|_| account.is_linked())
        else {
            return Ok(Vec::new());
        };

        match self.provider.list_accounts(access_token).await {
            Ok(accounts) => Ok(accounts),
            Err(err) => {
                warn!("Listing bank accounts for {} failed: {}", account.id, err);
                Ok(Vec::new())
            }
        }
    }

    async fn sync_transactions(&self, user_id: &str, account_id: &str) -> Result<BankSyncResult> {
        let account = self.linked_account(user_id, account_id)?;
        let start = self.sync_start(user_id, &account.id)?;
        let end = time_utils::today();

        let fetched = match account.plaid_id.as_deref().filter(|_| account.is_linked()) {
            Some(access_token) => self
                .provider
                .list_transactions(access_token, start, end)
                .await
                .unwrap_or_else(|err| {
                    warn!("Fetching bank transactions for {} failed: {}", account.id, err);
                    Vec::new()
                }),
            None => Vec::new(),
        };
        let fetched_count = fetched.len();

        let (rows, duplicates) = to_new_transactions(&account.id, fetched)?;
        let inserted = if rows.is_empty() {
            0
        } else {
            self.transaction_repository.create_many(rows).await?
        };
        info!(
            "Synced {} bank transactions into account {} ({}..{})",
            inserted, account.id, start, end
        );

        Ok(BankSyncResult {
            fetched: fetched_count,
            inserted,
            duplicates,
        })
    }
}

use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing financial accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, user_id: &str, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        debug!("Creating account '{}' for user {}", new_account.name, user_id);
        self.repository.create(user_id, new_account).await
    }

    async fn update_account(
        &self,
        user_id: &str,
        account_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account> {
        account_update.validate()?;
        self.repository
            .update(user_id, account_id, account_update)
            .await
    }

    async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_many(user_id, vec![account_id.to_string()])
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound("Account not found".to_string()));
        }
        Ok(())
    }

    async fn delete_accounts(&self, user_id: &str, account_ids: Vec<String>) -> Result<usize> {
        if account_ids.is_empty() {
            return Err(Error::invalid("No accounts selected"));
        }
        self.repository.delete_many(user_id, account_ids).await
    }

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        self.repository
            .get_by_id(user_id, account_id)?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }

    fn list_accounts(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Account>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repository.list(user_id, search)
    }
}

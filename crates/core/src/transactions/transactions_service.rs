use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::transactions_model::{
    normalize_notes, NewTransaction, Transaction, TransactionDetails, TransactionFilter,
    TransactionInput, TransactionQuery, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::amounts::to_storage_units;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::utils::{time_utils, Period};

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            account_repository,
            category_repository,
        }
    }

    fn ensure_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        self.account_repository
            .get_by_id(user_id, account_id)?
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }

    fn ensure_category(&self, user_id: &str, category_id: Option<&str>) -> Result<()> {
        match category_id {
            Some(id) => self
                .category_repository
                .get_by_id(user_id, id)?
                .map(|_| ())
                .ok_or_else(|| Error::NotFound("Category not found".to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(
        &self,
        user_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction> {
        input.validate()?;
        let category_id = input.category_id.filter(|c| !c.trim().is_empty());
        self.ensure_account(user_id, &input.financial_account_id)?;
        self.ensure_category(user_id, category_id.as_deref())?;

        let new_transaction = NewTransaction {
            financial_account_id: input.financial_account_id,
            category_id,
            amount: to_storage_units(input.amount)?,
            date: input.date,
            payee: input.payee.trim().to_string(),
            notes: normalize_notes(input.notes),
        };
        debug!(
            "Creating transaction of {} on account {}",
            new_transaction.amount, new_transaction.financial_account_id
        );
        self.repository.create(new_transaction).await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        update.validate()?;
        let mut transaction = self.get_transaction(user_id, transaction_id)?;

        if let Some(account_id) = update.financial_account_id {
            if account_id != transaction.financial_account_id {
                self.ensure_account(user_id, &account_id)?;
                transaction.financial_account_id = account_id;
            }
        }
        if let Some(category_id) = update.category_id {
            let category_id = category_id.filter(|c| !c.trim().is_empty());
            self.ensure_category(user_id, category_id.as_deref())?;
            transaction.category_id = category_id;
        }
        if let Some(amount) = update.amount {
            transaction.amount = to_storage_units(amount)?;
        }
        if let Some(date) = update.date {
            transaction.date = date;
        }
        if let Some(payee) = update.payee {
            transaction.payee = payee.trim().to_string();
        }
        if let Some(notes) = update.notes {
            transaction.notes = normalize_notes(notes);
        }

        self.repository.update(transaction).await
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_many(user_id, vec![transaction_id.to_string()])
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound("Transaction not found".to_string()));
        }
        Ok(())
    }

    async fn delete_transactions(
        &self,
        user_id: &str,
        transaction_ids: Vec<String>,
    ) -> Result<usize> {
        if transaction_ids.is_empty() {
            return Err(Error::invalid("No transactions selected"));
        }
        self.repository.delete_many(user_id, transaction_ids).await
    }

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.repository
            .get_by_id(user_id, transaction_id)?
            .ok_or_else(|| Error::NotFound("Transaction not found".to_string()))
    }

    fn list_transactions(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> Result<Vec<TransactionDetails>> {
        let period = Period::resolve(
            query.from.as_deref(),
            query.to.as_deref(),
            time_utils::today(),
        )?;
        let filter = TransactionFilter {
            start_date: period.start,
            end_date: period.end,
            account_id: query.account_id.filter(|a| !a.trim().is_empty()),
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        self.repository.search(user_id, &filter)
    }
}

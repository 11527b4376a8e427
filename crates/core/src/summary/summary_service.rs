use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::aggregation::{category_breakdown, daily_series, percentage_change, period_totals};
use super::summary_model::{Summary, SummaryQuery};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::transactions::TransactionRepositoryTrait;
use crate::users::UserRepositoryTrait;
use crate::utils::{time_utils, Period};

pub trait SummaryServiceTrait: Send + Sync {
    /// Builds the dashboard summary for the resolved period.
    fn get_summary(&self, user_id: &str, query: SummaryQuery) -> Result<Summary>;

    /// Same as [`get_summary`](Self::get_summary) with an explicit "today".
    fn get_summary_as_of(
        &self,
        user_id: &str,
        query: SummaryQuery,
        today: NaiveDate,
    ) -> Result<Summary>;
}

pub struct SummaryService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl SummaryService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            user_repository,
            transaction_repository,
            category_repository,
        }
    }
}

impl SummaryServiceTrait for SummaryService {
    fn get_summary(&self, user_id: &str, query: SummaryQuery) -> Result<Summary> {
        self.get_summary_as_of(user_id, query, time_utils::today())
    }

    fn get_summary_as_of(
        &self,
        user_id: &str,
        query: SummaryQuery,
        today: NaiveDate,
    ) -> Result<Summary> {
        if self.user_repository.get_by_id(user_id)?.is_none() {
            return Err(Error::Unauthorized("Unauthorized".to_string()));
        }

        let current = Period::resolve(query.from.as_deref(), query.to.as_deref(), today)?;
        let previous = current.previous()?;
        let account_id = query.account_id.as_deref().filter(|a| !a.trim().is_empty());
        debug!(
            "Summarizing {}..{} against {}..{} for user {}",
            current.start, current.end, previous.start, previous.end, user_id
        );

        // One read covers both periods; they are contiguous.
        let transactions = self.transaction_repository.list_in_range(
            user_id,
            previous.start,
            current.end,
            account_id,
        )?;

        let category_names: HashMap<String, String> = self
            .category_repository
            .list(user_id, None)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let now = period_totals(&transactions, &current)?;
        let before = period_totals(&transactions, &previous)?;

        Ok(Summary {
            remaining_change: percentage_change(before.remaining, now.remaining),
            income_change: percentage_change(before.income, now.income),
            expenses_change: percentage_change(before.expenses, now.expenses),
            income: now.income,
            expenses: now.expenses,
            remaining: now.remaining,
            categories: category_breakdown(&transactions, &current, &category_names)?,
            days: daily_series(&transactions, &current)?,
        })
    }
}

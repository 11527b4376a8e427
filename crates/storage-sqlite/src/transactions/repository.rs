use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use fintrack_core::transactions::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter,
    TransactionRepositoryTrait,
};
use fintrack_core::{Error, Result};

use super::model::{TransactionChangesetDB, TransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{financial_accounts, financial_categories, transactions};
use crate::utils::{chunk_for_sqlite, like_pattern, LIKE_ESCAPE, SQLITE_MAX_PARAMS_CHUNK};

/// Bound parameters per inserted transaction row.
const INSERT_PARAMS_PER_ROW: usize = 9;

/// Transactions are owned through their account. Every read joins (or
/// sub-selects) `financial_accounts` on the caller's id, so rows whose
/// account was deleted drop out of all results.
pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction_db: TransactionDB = new_transaction.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let created = diesel::insert_into(transactions::table)
                    .values(&transaction_db)
                    .returning(TransactionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(created.into())
            })
            .await
    }

    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        let rows: Vec<TransactionDB> = new_transactions
            .into_iter()
            .map(TransactionDB::from)
            .collect();
        debug!("Inserting {} transactions", rows.len());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for chunk in rows.chunks(SQLITE_MAX_PARAMS_CHUNK / INSERT_PARAMS_PER_ROW) {
                    inserted += diesel::insert_into(transactions::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        let transaction_id = transaction.id.clone();
        let changes: TransactionChangesetDB = transaction.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let updated = diesel::update(transactions::table.find(&transaction_id))
                    .set(&changes)
                    .returning(TransactionDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                updated
                    .map(Transaction::from)
                    .ok_or_else(|| Error::NotFound("Transaction not found".to_string()))
            })
            .await
    }

    async fn delete_many(&self, owner_id: &str, transaction_ids: Vec<String>) -> Result<usize> {
        let owner_id = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&transaction_ids) {
                    let owned_accounts = financial_accounts::table
                        .filter(financial_accounts::user_id.eq(&owner_id))
                        .select(financial_accounts::id);
                    deleted += diesel::delete(
                        transactions::table
                            .filter(transactions::id.eq_any(chunk))
                            .filter(transactions::financial_account_id.eq_any(owned_accounts)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, owner_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let found = transactions::table
            .inner_join(
                financial_accounts::table
                    .on(financial_accounts::id.eq(transactions::financial_account_id)),
            )
            .filter(financial_accounts::user_id.eq(owner_id))
            .filter(transactions::id.eq(transaction_id))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(found.map(Transaction::from))
    }

    fn search(&self, owner_id: &str, filter: &TransactionFilter) -> Result<Vec<TransactionDetails>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .inner_join(
                financial_accounts::table
                    .on(financial_accounts::id.eq(transactions::financial_account_id)),
            )
            .left_join(
                financial_categories::table
                    .on(transactions::category_id.eq(financial_categories::id.nullable())),
            )
            .filter(financial_accounts::user_id.eq(owner_id))
            .filter(transactions::date.ge(filter.start_date))
            .filter(transactions::date.le(filter.end_date))
            .into_boxed();

        if let Some(account_id) = filter.account_id.as_deref() {
            query = query.filter(transactions::financial_account_id.eq(account_id.to_string()));
        }

        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            query = query.filter(
                transactions::payee
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(transactions::id.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(financial_accounts::name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE))
                    .or(financial_categories::name
                        .nullable()
                        .like(pattern)
                        .escape(LIKE_ESCAPE)),
            );
        }

        let rows = query
            .select((
                TransactionDB::as_select(),
                financial_accounts::name,
                financial_categories::name.nullable(),
            ))
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .load::<(TransactionDB, String, Option<String>)>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(|(transaction, account_name, category_name)| TransactionDetails {
                transaction: transaction.into(),
                account_name,
                category_name,
            })
            .collect())
    }

    fn list_in_range(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .inner_join(
                financial_accounts::table
                    .on(financial_accounts::id.eq(transactions::financial_account_id)),
            )
            .filter(financial_accounts::user_id.eq(owner_id))
            .filter(transactions::date.ge(start))
            .filter(transactions::date.le(end))
            .into_boxed();

        if let Some(account_id) = account_id {
            query = query.filter(transactions::financial_account_id.eq(account_id.to_string()));
        }

        let rows = query
            .select(TransactionDB::as_select())
            .order(transactions::date.asc())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn latest_date(&self, owner_id: &str, account_id: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let latest = transactions::table
            .inner_join(
                financial_accounts::table
                    .on(financial_accounts::id.eq(transactions::financial_account_id)),
            )
            .filter(financial_accounts::user_id.eq(owner_id))
            .filter(transactions::financial_account_id.eq(account_id))
            .select(max(transactions::date))
            .first::<Option<NaiveDate>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(latest)
    }
}

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use fintrack_core::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use fintrack_core::{Error, Result};

use super::model::AccountDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::financial_accounts;
use crate::schema::financial_accounts::dsl::*;
use crate::utils::{chunk_for_sqlite, like_pattern, LIKE_ESCAPE};

/// Repository for managing financial accounts in the database
pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn account_not_found() -> Error {
    Error::NotFound("Account not found".to_string())
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, owner_id: &str, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let account_db = AccountDB::new(owner_id, new_account);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let created = diesel::insert_into(financial_accounts::table)
                    .values(&account_db)
                    .returning(AccountDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(created.into())
            })
            .await
    }

    async fn update(
        &self,
        owner_id: &str,
        account_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account> {
        account_update.validate()?;
        let owner_id = owner_id.to_string();
        let account_id = account_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let updated = diesel::update(
                    financial_accounts
                        .filter(id.eq(&account_id))
                        .filter(user_id.eq(&owner_id)),
                )
                .set((
                    name.eq(account_update.name.trim()),
                    updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .returning(AccountDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?;
                updated.map(Account::from).ok_or_else(account_not_found)
            })
            .await
    }

    async fn set_plaid_id(
        &self,
        owner_id: &str,
        account_id: &str,
        access_token: String,
    ) -> Result<Account> {
        let owner_id = owner_id.to_string();
        let account_id = account_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let updated = diesel::update(
                    financial_accounts
                        .filter(id.eq(&account_id))
                        .filter(user_id.eq(&owner_id)),
                )
                .set((
                    plaid_id.eq(Some(access_token)),
                    updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .returning(AccountDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?;
                updated.map(Account::from).ok_or_else(account_not_found)
            })
            .await
    }

    async fn delete_many(&self, owner_id: &str, account_ids: Vec<String>) -> Result<usize> {
        let owner_id = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&account_ids) {
                    deleted += diesel::delete(
                        financial_accounts
                            .filter(user_id.eq(&owner_id))
                            .filter(id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, owner_id: &str, account_id: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let account = financial_accounts
            .filter(id.eq(account_id))
            .filter(user_id.eq(owner_id))
            .select(AccountDB::as_select())
            .first::<AccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(account.map(Account::from))
    }

    fn list(&self, owner_id: &str, search: Option<&str>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = financial_accounts::table
            .filter(user_id.eq(owner_id))
            .into_boxed();

        if let Some(pattern) = like_pattern(search) {
            query = query.filter(
                name.like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(id.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(plaid_id.like(pattern).escape(LIKE_ESCAPE)),
            );
        }

        let results = query
            .select(AccountDB::as_select())
            .order((created_at.desc(), id.asc()))
            .load::<AccountDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Account::from).collect())
    }
}

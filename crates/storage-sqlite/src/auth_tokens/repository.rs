use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use fintrack_core::users::{AuthToken, AuthTokenRepositoryTrait, NewAuthToken, TokenKind};
use fintrack_core::Result;

use super::model::{AuthTokenDB, TwoFactorConfirmationDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{auth_tokens, two_factor_confirmations};

pub struct AuthTokenRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AuthTokenRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AuthTokenRepositoryTrait for AuthTokenRepository {
    async fn replace(&self, new_token: NewAuthToken) -> Result<AuthToken> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AuthToken> {
                let token_db: AuthTokenDB = new_token.into();
                diesel::delete(
                    auth_tokens::table
                        .filter(auth_tokens::kind.eq(&token_db.kind))
                        .filter(auth_tokens::email.eq(&token_db.email)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                let stored = diesel::insert_into(auth_tokens::table)
                    .values(&token_db)
                    .returning(AuthTokenDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                AuthToken::try_from(stored)
            })
            .await
    }

    fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<AuthToken>> {
        let mut conn = get_connection(&self.pool)?;
        let found = auth_tokens::table
            .filter(auth_tokens::kind.eq(kind.as_str()))
            .filter(auth_tokens::token.eq(token))
            .select(AuthTokenDB::as_select())
            .first::<AuthTokenDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        found.map(AuthToken::try_from).transpose()
    }

    fn find_by_email(&self, kind: TokenKind, email: &str) -> Result<Option<AuthToken>> {
        let mut conn = get_connection(&self.pool)?;
        let found = auth_tokens::table
            .filter(auth_tokens::kind.eq(kind.as_str()))
            .filter(auth_tokens::email.eq(email))
            .select(AuthTokenDB::as_select())
            .first::<AuthTokenDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        found.map(AuthToken::try_from).transpose()
    }

    async fn delete(&self, token_id: &str) -> Result<()> {
        let token_id = token_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(auth_tokens::table.find(token_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn upsert_two_factor_confirmation(&self, user_id: &str) -> Result<()> {
        let confirmation = TwoFactorConfirmationDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(two_factor_confirmations::table)
                    .values(&confirmation)
                    .on_conflict(two_factor_confirmations::user_id)
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn take_two_factor_confirmation(&self, user_id: &str) -> Result<bool> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let removed = diesel::delete(
                    two_factor_confirmations::table
                        .filter(two_factor_confirmations::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(removed > 0)
            })
            .await
    }
}

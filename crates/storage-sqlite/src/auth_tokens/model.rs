use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::users::{AuthToken, NewAuthToken, TokenKind};
use fintrack_core::Result;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuthTokenDB {
    pub id: String,
    pub kind: String,
    pub email: String,
    pub token: String,
    pub expires_at: NaiveDateTime,
}

impl TryFrom<AuthTokenDB> for AuthToken {
    type Error = fintrack_core::Error;

    fn try_from(db: AuthTokenDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            kind: TokenKind::parse(&db.kind)?,
            email: db.email,
            token: db.token,
            expires_at: db.expires_at,
        })
    }
}

impl From<NewAuthToken> for AuthTokenDB {
    fn from(domain: NewAuthToken) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: domain.kind.as_str().to_string(),
            email: domain.email,
            token: domain.token,
            expires_at: domain.expires_at,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::two_factor_confirmations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TwoFactorConfirmationDB {
    pub id: String,
    pub user_id: String,
}

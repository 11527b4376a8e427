//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::users::{NewUser, User, UserUpdate};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<NaiveDateTime>,
    pub password_hash: Option<String>,
    pub is_two_factor_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            email_verified: db.email_verified,
            password_hash: db.password_hash,
            is_two_factor_enabled: db.is_two_factor_enabled,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_two_factor_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<NewUser> for NewUserDB {
    fn from(domain: NewUser) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: domain.name,
            email: domain.email,
            password_hash: domain.password_hash,
            is_two_factor_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left out of the `SET` clause.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangesetDB {
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<NaiveDateTime>,
    pub password_hash: Option<String>,
    pub is_two_factor_enabled: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<UserUpdate> for UserChangesetDB {
    fn from(update: UserUpdate) -> Self {
        Self {
            name: update.name,
            email: update.email,
            email_verified: update.email_verified,
            password_hash: update.password_hash,
            is_two_factor_enabled: update.is_two_factor_enabled,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

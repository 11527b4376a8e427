//! Database model for financial accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::accounts::{Account, NewAccount};

/// Database model for financial accounts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::financial_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub plaid_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            plaid_id: db.plaid_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl AccountDB {
    pub fn new(user_id: &str, domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: domain.name.trim().to_string(),
            plaid_id: domain.plaid_id.filter(|p| !p.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}

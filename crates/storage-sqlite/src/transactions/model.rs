use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use fintrack_core::transactions::{NewTransaction, Transaction};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub financial_account_id: String,
    pub category_id: Option<String>,
    pub amount: i64,
    pub date: NaiveDate,
    pub payee: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            financial_account_id: db.financial_account_id,
            category_id: db.category_id,
            amount: db.amount,
            date: db.date,
            payee: db.payee,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            financial_account_id: domain.financial_account_id,
            category_id: domain.category_id,
            amount: domain.amount,
            date: domain.date,
            payee: domain.payee,
            notes: domain.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Full replacement of the mutable columns; `None` writes `NULL`.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(treat_none_as_null = true)]
pub struct TransactionChangesetDB {
    pub financial_account_id: String,
    pub category_id: Option<String>,
    pub amount: i64,
    pub date: NaiveDate,
    pub payee: String,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<Transaction> for TransactionChangesetDB {
    fn from(domain: Transaction) -> Self {
        Self {
            financial_account_id: domain.financial_account_id,
            category_id: domain.category_id,
            amount: domain.amount,
            date: domain.date,
            payee: domain.payee,
            notes: domain.notes,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FieldError, Result, ValidationError};

/// A persisted income (positive) or expense (negative) entry.
///
/// `amount` is in storage units (milli-units of the display currency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
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

/// A transaction joined with the names of its account and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_name: String,
    pub category_name: Option<String>,
}

/// Storage-ready transaction: the amount is already in milli-units.
///
/// Produced by manual entry, the import reconciler and bank sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub financial_account_id: String,
    pub category_id: Option<String>,
    pub amount: i64,
    pub date: NaiveDate,
    pub payee: String,
    pub notes: Option<String>,
}

/// Manual entry submitted by a user; `amount` is a display amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub financial_account_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payee: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.financial_account_id.trim().is_empty() {
            errors.push(FieldError::new("financialAccountId", "Account is required"));
        }
        if self.payee.trim().is_empty() {
            errors.push(FieldError::new("payee", "Payee is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::Fields(errors)))
        }
    }
}

/// Patch for an existing transaction. Absent fields keep their value;
/// `categoryId: null` and `notes: null` clear the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(default)]
    pub financial_account_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub category_id: Option<Option<String>>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub payee: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(account_id) = &self.financial_account_id {
            if account_id.trim().is_empty() {
                errors.push(FieldError::new("financialAccountId", "Account is required"));
            }
        }
        if let Some(payee) = &self.payee {
            if payee.trim().is_empty() {
                errors.push(FieldError::new("payee", "Payee is required"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::Fields(errors)))
        }
    }
}

/// Raw listing parameters as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub account_id: Option<String>,
    pub search: Option<String>,
}

/// Resolved listing filter handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_id: Option<String>,
    pub search: Option<String>,
}

/// Empty notes are stored as absent.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

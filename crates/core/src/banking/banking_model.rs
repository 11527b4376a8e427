//! Bank aggregator models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FieldError, Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkToken {
    pub link_token: String,
}

/// Long-lived credentials obtained by exchanging a link public token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankLinkCredentials {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankBalances {
    pub available: Option<Decimal>,
    pub current: Option<Decimal>,
    pub iso_currency_code: Option<String>,
}

/// An account held at the linked institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub account_id: String,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub subtype: Option<String>,
    pub balances: BankBalances,
}

/// A transaction reported by the aggregator, amount in display units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub transaction_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectBankInput {
    pub account_id: String,
    pub public_token: String,
}

impl ConnectBankInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.account_id.trim().is_empty() {
            errors.push(FieldError::new("accountId", "Account is required"));
        }
        if self.public_token.trim().is_empty() {
            errors.push(FieldError::new("publicToken", "Public token is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::Fields(errors)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSyncResult {
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

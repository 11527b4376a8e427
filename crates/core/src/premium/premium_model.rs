//! Premium entitlement and payment models.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FieldError, Result, ValidationError};

/// A user's premium entitlement; at most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Premium {
    pub id: String,
    pub user_id: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A completed premium purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Amount paid, in the gateway's minor units.
    pub total: i64,
    pub payment_id: String,
    pub order_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub total: i64,
    pub payment_id: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatus {
    pub is_premium: bool,
}

/// Order creation request sent to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOrderRequest {
    /// Price in minor units (e.g. paise).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

/// Order as created by the payment gateway; the client completes checkout
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Checkout result posted back by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub signature: String,
}

impl PaymentConfirmation {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.payment_id.trim().is_empty() {
            errors.push(FieldError::new("paymentId", "Payment id is required"));
        }
        if self.order_id.trim().is_empty() {
            errors.push(FieldError::new("orderId", "Order id is required"));
        }
        match self.amount {
            Some(amount) if amount > 0 => {}
            _ => errors.push(FieldError::new("amount", "Amount is required")),
        }
        if self.signature.trim().is_empty() {
            errors.push(FieldError::new("signature", "Signature is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::Fields(errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_requires_every_field() {
        let empty = PaymentConfirmation::default();
        assert_eq!(empty.validate().unwrap_err().field_errors().len(), 4);

        let full: PaymentConfirmation = serde_json::from_str(
            r#"{"paymentId": "pay_1", "orderId": "order_1", "amount": 900, "signature": "ab"}"#,
        )
        .unwrap();
        assert!(full.validate().is_ok());
    }
}

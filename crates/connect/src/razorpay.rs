//! Razorpay payment gateway client.
//!
//! Orders are created through the REST API with basic auth; checkout results
//! are verified locally against the HMAC-SHA256 signature Razorpay issues
//! over `order_id|payment_id`.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;

use fintrack_core::errors::{Error, Result};
use fintrack_core::premium::{PaymentGatewayTrait, PaymentOrder, PaymentOrderRequest};

use crate::http::{build_client, join_url, parse_response, request_failed};

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "Razorpay";

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: bool,
    notes: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: &str, key_secret: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: DEFAULT_RAZORPAY_API_URL.to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        })
    }

    /// Override API base URL (useful for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Hex-encoded HMAC-SHA256 of `order_id|payment_id` under the key secret.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String> {
        let mac = self.mac_for(order_id, payment_id)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn mac_for(&self, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| Error::Unexpected(format!("Invalid Razorpay key secret: {}", e)))?;
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(mac)
    }
}

#[async_trait]
impl PaymentGatewayTrait for RazorpayClient {
    async fn create_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder> {
        let url = join_url(&self.base_url, "/v1/orders");
        debug!("[Razorpay] POST {} ({} {})", url, request.amount, request.currency);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount: request.amount,
                currency: &request.currency,
                receipt: &request.receipt,
                payment_capture: false,
                notes: &request.notes,
            })
            .send()
            .await
            .map_err(|e| request_failed(SERVICE, e))?;

        let order: OrderResponse = parse_response(SERVICE, response).await?;
        Ok(PaymentOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            status: order.status,
        })
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool> {
        let Ok(expected) = hex::decode(signature.trim()) else {
            warn!("[Razorpay] Signature for order {} is not hex", order_id);
            return Ok(false);
        };
        Ok(self
            .mac_for(order_id, payment_id)?
            .verify_slice(&expected)
            .is_ok())
    }
}

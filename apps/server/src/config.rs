use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use fintrack_core::constants::DEFAULT_PREMIUM_PRICE;

use crate::auth::decode_secret_key;

const DEFAULT_MAIL_FROM: &str = "Fintrack <onboarding@resend.dev>";

#[derive(Debug, Clone)]
pub struct PlaidSettings {
    pub client_id: String,
    pub secret: String,
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct RazorpaySettings {
    pub key_id: String,
    pub key_secret: String,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub frontend_url: String,
    /// Premium price in whole currency units.
    pub premium_price: i64,
    pub plaid: Option<PlaidSettings>,
    pub razorpay: Option<RazorpaySettings>,
    pub mail: Option<MailSettings>,
    pub ocr_url: Option<String>,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = var("FT_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid FT_LISTEN_ADDR")?;
        let db_path = var("FT_DB_PATH").unwrap_or_else(|| "./db/app.db".into());
        let cors_allow = var("FT_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("FT_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);

        let jwt_secret = var("FT_JWT_SECRET").context("FT_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&jwt_secret)?;
        let ttl_secs: u64 = var("FT_ACCESS_TOKEN_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let frontend_url =
            var("FT_FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".into());
        let premium_price = match var("FT_PREMIUM_PRICE") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p > 0)
                .context("FT_PREMIUM_PRICE must be a positive integer")?,
            None => DEFAULT_PREMIUM_PRICE,
        };

        let plaid = match (var("PLAID_CLIENT_ID"), var("PLAID_SECRET")) {
            (Some(client_id), Some(secret)) => Some(PlaidSettings {
                client_id,
                secret,
                environment: var("PLAID_ENV").unwrap_or_else(|| "sandbox".into()),
            }),
            _ => None,
        };
        let razorpay = match (var("RAZORPAY_KEY_ID"), var("RAZORPAY_KEY_SECRET")) {
            (Some(key_id), Some(key_secret)) => Some(RazorpaySettings { key_id, key_secret }),
            _ => None,
        };
        let mail = var("RESEND_API_KEY").map(|api_key| MailSettings {
            api_key,
            from: var("FT_MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.into()),
        });

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            access_token_ttl: Duration::from_secs(ttl_secs),
            frontend_url,
            premium_price,
            plaid,
            razorpay,
            mail,
            ocr_url: var("FT_OCR_URL"),
        })
    }
}

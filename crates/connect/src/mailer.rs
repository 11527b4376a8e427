//! Transactional email senders.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use fintrack_core::errors::Result;
use fintrack_core::notifications::{EmailMessage, EmailSenderTrait};

use crate::http::{build_client, join_url, parse_response, request_failed};

const SERVICE: &str = "Resend";

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Sends mail through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: &str, from: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: DEFAULT_RESEND_API_URL.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }

    /// Override API base URL (useful for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmailSenderTrait for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(join_url(&self.base_url, "/emails"))
            .bearer_auth(&self.api_key)
            .json(&SendEmailBody {
                from: &self.from,
                to: [&message.to],
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await
            .map_err(|e| request_failed(SERVICE, e))?;

        let sent: SendEmailResponse = parse_response(SERVICE, response).await?;
        debug!("[Resend] Queued email {} to {}", sent.id, message.to);
        Ok(())
    }
}

/// Writes outgoing mail to the log instead of delivering it.
///
/// Used when no email API key is configured so local sign-up flows still
/// expose their links and codes.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl EmailSenderTrait for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        info!(
            "[mail] to={} subject={:?} body={}",
            message.to, message.subject, message.html
        );
        Ok(())
    }
}

//! Outgoing email: the sender seam and the messages the application sends.

mod templates;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;

pub use templates::{password_reset_email, two_factor_email, verification_email};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers transactional email.
#[async_trait]
pub trait EmailSenderTrait: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

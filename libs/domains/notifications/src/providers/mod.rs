//! Mail transport implementations.
//!
//! This module contains the `EmailProvider` trait and the Resend (production)
//! and SMTP (local development) transports behind it.

mod resend;
mod smtp;

pub use resend::{ResendConfig, ResendProvider};
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::NotificationResult;
use crate::models::ProviderReceipt;
use async_trait::async_trait;

/// A fully addressed email, ready for the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailContent {
    /// Sender address.
    pub from: String,
    /// Reply-To address.
    pub reply_to: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line. `None` when the payload carried none.
    pub subject: Option<String>,
    /// HTML body content.
    pub html_body: String,
    /// Plain text body content.
    pub text_body: String,
}

/// Trait for mail transports.
///
/// One call is one attempt: implementations never retry and report any
/// failure as [`crate::NotificationError::ProviderSend`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email and return the provider's confirmation.
    async fn send(&self, email: &EmailContent) -> NotificationResult<ProviderReceipt>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;

    /// Check if the provider is healthy/configured.
    async fn health_check(&self) -> NotificationResult<bool>;
}

//! Resend email provider implementation.

use super::{EmailContent, EmailProvider};
use crate::error::{NotificationError, NotificationResult};
use crate::models::ProviderReceipt;
use async_trait::async_trait;
use core_config::env_or_default;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const DEFAULT_API_URL: &str = "https://api.resend.com";

/// Resend API configuration.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API key.
    pub api_key: String,
    /// Resend API base URL (defaults to production).
    pub api_url: String,
}

impl ResendConfig {
    /// Create a new Resend configuration against the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Like [`ResendConfig::new`], honouring `RESEND_API_URL` when set.
    pub fn with_env_api_url(api_key: impl Into<String>) -> Self {
        Self {
            api_url: env_or_default("RESEND_API_URL", DEFAULT_API_URL),
            ..Self::new(api_key)
        }
    }

    /// Builder method to point at another API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Resend email provider.
///
/// No request timeout is set: a hung call hangs the caller.
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

impl ResendProvider {
    /// Create a new Resend provider.
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_url.trim_end_matches('/'))
    }
}

// Resend API request/response structures

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    reply_to: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    html: &'a str,
    text: &'a str,
}

impl<'a> From<&'a EmailContent> for ResendRequest<'a> {
    fn from(email: &'a EmailContent) -> Self {
        Self {
            from: &email.from,
            reply_to: &email.reply_to,
            to: &email.to,
            subject: email.subject.as_deref(),
            html: &email.html_body,
            text: &email.text_body,
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Populated by deserialization from the Resend API
struct ResendError {
    message: String,
    name: Option<String>,
}

/// The provider's own message when the body is a Resend error, else the body.
fn error_message(body: String) -> String {
    match serde_json::from_str::<ResendError>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<ProviderReceipt> {
        debug!(
            to = ?email.to,
            subject = ?email.subject,
            "Sending email via Resend"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&ResendRequest::from(email))
            .send()
            .await
            .map_err(|e| {
                error!(to = ?email.to, error = %e, "Resend request failed");
                NotificationError::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let receipt: ProviderReceipt = response.json().await?;
            info!(
                to = ?email.to,
                message_id = %receipt.id,
                "Email sent successfully via Resend"
            );
            Ok(receipt)
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(
                to = ?email.to,
                status = %status,
                error = %body,
                "Failed to send email via Resend"
            );
            Err(NotificationError::ProviderSend(error_message(body)))
        }
    }

    fn name(&self) -> &'static str {
        "Resend"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        // No cheap health endpoint; Resend keys are issued with an re_ prefix
        if self.config.api_key.starts_with("re_") {
            Ok(true)
        } else {
            Err(NotificationError::Configuration(
                "Invalid Resend API key format".to_string(),
            ))
        }
    }
}

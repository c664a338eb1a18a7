//! SMTP email provider implementation using lettre.
//!
//! Intended for local development against Mailpit/MailHog.

use super::{EmailContent, EmailProvider};
use crate::error::{NotificationError, NotificationResult};
use crate::models::ProviderReceipt;
use async_trait::async_trait;
use core_config::{env_flag, env_optional, env_or_default};
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::Value;
use tracing::{debug, error, info};

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username (optional for dev servers like Mailpit).
    pub username: Option<String>,
    /// SMTP password (optional for dev servers like Mailpit).
    pub password: Option<String>,
    /// Whether to use TLS (false for local dev servers).
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Create a new SMTP configuration without TLS or credentials.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            use_tls: false,
        }
    }

    /// Configuration for MailHog/Mailpit, overridable through `SMTP_*` variables.
    pub fn mailhog() -> Self {
        Self {
            host: env_or_default("SMTP_HOST", "localhost"),
            port: env_or_default("SMTP_PORT", "1025").parse().unwrap_or(1025),
            username: env_optional("SMTP_USERNAME"),
            password: env_optional("SMTP_PASSWORD"),
            use_tls: env_flag("SMTP_USE_TLS", false),
        }
    }

    /// Builder method to set TLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Builder method to set credentials.
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }
}

/// SMTP email provider for development.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpProvider {
    /// Create a new SMTP provider.
    pub fn new(config: SmtpConfig) -> NotificationResult<Self> {
        let transport = Self::build_transport(&config)?;
        Ok(Self { transport, config })
    }

    /// Create a provider configured for MailHog/Mailpit.
    pub fn mailhog() -> NotificationResult<Self> {
        Self::new(SmtpConfig::mailhog())
    }

    fn build_transport(config: &SmtpConfig) -> NotificationResult<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some(Credentials::new(username.clone(), password.clone())),
            _ => None,
        };

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| NotificationError::Configuration(format!("Failed to create SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        Ok(builder.build())
    }

    /// Build a lettre Message from EmailContent.
    fn build_message(email: &EmailContent) -> NotificationResult<Message> {
        let parse = |label: &str, addr: &str| -> NotificationResult<Mailbox> {
            addr.parse()
                .map_err(|e| NotificationError::ProviderSend(format!("Invalid {} address '{}': {}", label, addr, e)))
        };

        let mut builder = Message::builder()
            .from(parse("from", &email.from)?)
            .reply_to(parse("reply-to", &email.reply_to)?);

        for to in &email.to {
            builder = builder.to(parse("to", to)?);
        }

        if let Some(subject) = &email.subject {
            builder = builder.subject(subject);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::ProviderSend(format!("Failed to build email message: {}", e)))
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<ProviderReceipt> {
        debug!(
            to = ?email.to,
            subject = ?email.subject,
            host = %self.config.host,
            port = %self.config.port,
            "Sending email via SMTP"
        );

        let message = Self::build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = ?email.to, error = %e, "Failed to send email via SMTP");
            NotificationError::ProviderSend(e.to_string())
        })?;

        // The server's reply text usually carries the queued message id
        let mut receipt = ProviderReceipt::new(
            response.message().collect::<Vec<_>>().join(" "),
        );
        receipt
            .extra
            .insert("code".to_string(), Value::String(response.code().to_string()));

        info!(
            to = ?email.to,
            message_id = %receipt.id,
            "Email sent successfully via SMTP"
        );

        Ok(receipt)
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| NotificationError::ProviderSend(format!("SMTP health check failed: {}", e)))
    }
}

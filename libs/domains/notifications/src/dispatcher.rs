//! Channel router: decides between the feed acknowledgement and an email send.

use crate::error::NotificationResult;
use crate::models::{
    DeliveryStatus, FEED_CHANNEL, FeedAcknowledgement, NotificationOutcome, NotificationRequest,
    NotificationTemplate,
};
use crate::options::{ModuleOptions, PROVIDER_ID};
use crate::providers::{EmailContent, EmailProvider};
use crate::templates::{RenderedEmail, TemplateEngine};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// What the platform's notification module calls into.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Stable provider identifier.
    fn identifier(&self) -> &'static str;

    /// Dispatch one request, keyed by its template.
    async fn send(&self, request: NotificationRequest) -> NotificationResult<NotificationOutcome>;

    /// Dispatch by event name. The event doubles as the template tag.
    ///
    /// `attachments` is accepted for interface compatibility and ignored.
    async fn send_notification(
        &self,
        event: &str,
        data: Value,
        attachments: Option<Value>,
    ) -> NotificationResult<NotificationOutcome> {
        let _ = attachments;
        self.send(NotificationRequest::new(event, data)).await
    }
}

/// Routes notification requests to the feed acknowledgement or to the mail
/// transport.
///
/// Holds only read-only state, so one instance serves concurrent dispatches.
pub struct NotificationDispatcher<P: EmailProvider> {
    options: Arc<ModuleOptions>,
    provider: Arc<P>,
    templates: Arc<TemplateEngine>,
}

impl<P: EmailProvider + 'static> NotificationDispatcher<P> {
    /// Create a dispatcher from already validated options.
    pub fn new(options: ModuleOptions, provider: P, templates: TemplateEngine) -> Self {
        info!(
            provider = PROVIDER_ID,
            channels = ?options.channels(),
            emails_enabled = options.emails_enabled(),
            "Notification dispatcher initialized"
        );
        Self {
            options: Arc::new(options),
            provider: Arc::new(provider),
            templates: Arc::new(templates),
        }
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    /// Get a reference to the mail transport.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Empty overrides count as absent.
    fn recipient(&self, to: Option<&str>) -> String {
        to.filter(|to| !to.is_empty())
            .unwrap_or_else(|| self.options.to_email())
            .to_string()
    }

    fn handle_feed(&self, to: Option<&str>, data: Value) -> NotificationOutcome {
        let to = self.recipient(to);
        debug!(to = %to, channel = FEED_CHANNEL, "Acknowledging feed notification");

        NotificationOutcome::Acknowledged(FeedAcknowledgement {
            to,
            status: DeliveryStatus::Success,
            data,
        })
    }

    /// Send through the transport unless the email gate is closed.
    async fn send_mail(
        &self,
        template: &NotificationTemplate,
        subject: Option<String>,
        body: RenderedEmail,
        to: Option<&str>,
    ) -> NotificationResult<NotificationOutcome> {
        if !self.options.emails_enabled() {
            debug!(template = %template, "Email notifications disabled, skipping send");
            return Ok(NotificationOutcome::skipped());
        }

        let email = EmailContent {
            from: self.options.from_email().to_string(),
            reply_to: self.options.reply_to_email().to_string(),
            to: vec![self.recipient(to)],
            subject,
            html_body: body.html,
            text_body: body.text,
        };

        let receipt = self.provider.send(&email).await?;

        info!(
            template = %template,
            to = ?email.to,
            message_id = %receipt.id,
            "Notification email sent"
        );
        Ok(NotificationOutcome::Sent(receipt))
    }
}

#[async_trait]
impl<P: EmailProvider + 'static> NotificationProvider for NotificationDispatcher<P> {
    fn identifier(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn send(&self, request: NotificationRequest) -> NotificationResult<NotificationOutcome> {
        let subject = request.subject();
        let NotificationRequest { template, to, data } = request;

        match &template {
            NotificationTemplate::Feed => Ok(self.handle_feed(to.as_deref(), data)),
            NotificationTemplate::OrderPlaced => {
                let body = self.templates.render_order_placed(&data)?;
                self.send_mail(&template, subject, body, to.as_deref()).await
            }
            NotificationTemplate::ResetPassword => {
                let url = data.get("url").and_then(Value::as_str);
                let body = self.templates.render_reset_password(url)?;
                self.send_mail(&template, subject, body, to.as_deref()).await
            }
            NotificationTemplate::Unknown(tag) => {
                debug!(template = %tag, "No handler for template, ignoring");
                Ok(NotificationOutcome::skipped())
            }
        }
    }

    /// Events whose name contains "feed" are acknowledged to the configured
    /// recipient without touching the template routing.
    async fn send_notification(
        &self,
        event: &str,
        data: Value,
        _attachments: Option<Value>,
    ) -> NotificationResult<NotificationOutcome> {
        if event.contains(FEED_CHANNEL) {
            return Ok(self.handle_feed(None, data));
        }

        self.send(NotificationRequest::new(event, data)).await
    }
}

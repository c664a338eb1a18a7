//! Shared fixtures for the notifications integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_notifications::*;
use std::sync::{Arc, Mutex};

/// In-memory transport that records every email it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    sent: Arc<Mutex<Vec<EmailContent>>>,
    failure: Option<String>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailContent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<ProviderReceipt> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.failure {
            Some(message) => Err(NotificationError::ProviderSend(message.clone())),
            None => {
                let count = self.sent.lock().unwrap().len();
                Ok(ProviderReceipt::new(format!("msg_{count}")))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Recording"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(self.failure.is_none())
    }
}

pub fn raw_options(enable_emails: &str) -> RawModuleOptions {
    RawModuleOptions {
        api_key: Some("re_integration".to_string()),
        from_email: Some("shop@store.test".to_string()),
        reply_to_email: Some("support@store.test".to_string()),
        to_email: Some("ops@store.test".to_string()),
        enable_emails: Some(EnableFlag::Text(enable_emails.to_string())),
        channels: Some(vec!["email".to_string()]),
    }
}

pub fn dispatcher(
    enable_emails: &str,
    provider: RecordingProvider,
) -> NotificationDispatcher<RecordingProvider> {
    let options = ModuleOptions::validate(raw_options(enable_emails)).unwrap();
    NotificationDispatcher::new(options, provider, TemplateEngine::new().unwrap())
}

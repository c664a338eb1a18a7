//! Provider options: raw input, validation, and the immutable validated form.

use crate::error::{NotificationError, NotificationResult};
use crate::models::FEED_CHANNEL;
use core_config::{env_list, env_optional};
use serde::Deserialize;
use tracing::debug;

/// Identifier reported in configuration errors and by the dispatcher.
pub const PROVIDER_ID: &str = "resend-notification";

/// Channel list used when the raw options do not declare one.
const DEFAULT_CHANNEL: &str = "email";

/// `enableEmails` as supplied: the platform config sometimes passes a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnableFlag {
    Bool(bool),
    Text(String),
}

impl EnableFlag {
    fn into_text(self) -> String {
        match self {
            EnableFlag::Bool(flag) => flag.to_string(),
            EnableFlag::Text(text) => text,
        }
    }
}

/// Options as handed over by the module registry, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModuleOptions {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    pub reply_to_email: Option<String>,
    pub to_email: Option<String>,
    pub enable_emails: Option<EnableFlag>,
    pub channels: Option<Vec<String>>,
}

impl RawModuleOptions {
    /// Read raw options from the deployment environment.
    ///
    /// Nothing is validated here; unset variables stay `None`.
    pub fn from_env() -> Self {
        Self {
            api_key: env_optional("RESEND_API_KEY"),
            from_email: env_optional("RESEND_FROM_EMAIL"),
            reply_to_email: env_optional("RESEND_REPLY_TO_EMAIL"),
            to_email: env_optional("TO_EMAIL"),
            enable_emails: env_optional("ENABLE_EMAIL_NOTIFICATIONS").map(EnableFlag::Text),
            channels: env_list("NOTIFICATION_CHANNELS"),
        }
    }
}

/// Validated provider options. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOptions {
    api_key: String,
    from_email: String,
    reply_to_email: String,
    to_email: String,
    enable_emails: String,
    channels: Vec<String>,
}

impl ModuleOptions {
    /// Validate raw options.
    ///
    /// Fails with [`NotificationError::Configuration`] naming every required
    /// key that is missing or blank. The returned channel list contains
    /// `"feed"` exactly once.
    pub fn validate(raw: RawModuleOptions) -> NotificationResult<Self> {
        let mut missing = Vec::new();
        let mut required = |key: &'static str, value: Option<String>| -> String {
            match value {
                Some(value) if !value.trim().is_empty() => value,
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let api_key = required("apiKey", raw.api_key);
        let from_email = required("fromEmail", raw.from_email);
        let reply_to_email = required("replyToEmail", raw.reply_to_email);
        let to_email = required("toEmail", raw.to_email);
        let enable_emails = required("enableEmails", raw.enable_emails.map(EnableFlag::into_text));

        if !missing.is_empty() {
            return Err(NotificationError::Configuration(format!(
                "{} is missing required option(s): {}",
                PROVIDER_ID,
                missing.join(", ")
            )));
        }

        let channels = with_feed_channel(
            raw.channels
                .unwrap_or_else(|| vec![DEFAULT_CHANNEL.to_string()]),
        );
        debug!(channels = ?channels, "Notification options validated");

        Ok(Self {
            api_key,
            from_email,
            reply_to_email,
            to_email,
            enable_emails,
            channels,
        })
    }

    /// Load from the environment and validate.
    pub fn from_env() -> NotificationResult<Self> {
        Self::validate(RawModuleOptions::from_env())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    pub fn reply_to_email(&self) -> &str {
        &self.reply_to_email
    }

    pub fn to_email(&self) -> &str {
        &self.to_email
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// The global send gate: only a case-insensitive `"true"` enables email.
    pub fn emails_enabled(&self) -> bool {
        self.enable_emails.to_lowercase() == "true"
    }
}

/// Keep the first `"feed"`, drop later duplicates, append one if absent.
fn with_feed_channel(mut channels: Vec<String>) -> Vec<String> {
    let mut seen = false;
    channels.retain(|channel| {
        if channel != FEED_CHANNEL {
            return true;
        }
        !std::mem::replace(&mut seen, true)
    });
    if !seen {
        channels.push(FEED_CHANNEL.to_string());
    }
    channels
}

//! Data models for the notifications domain.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel name that is always present in the effective channel list.
pub const FEED_CHANNEL: &str = "feed";

// ============================================================================
// Templates
// ============================================================================

/// Logical message kind carried by a dispatch request.
///
/// Parsed from the upstream string tag. Anything unrecognized is kept verbatim
/// in [`NotificationTemplate::Unknown`] so the router can ignore it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationTemplate {
    /// Order confirmation email.
    OrderPlaced,
    /// Password reset email.
    ResetPassword,
    /// Local feed acknowledgement; never leaves the process.
    Feed,
    /// Any other tag.
    Unknown(String),
}

impl NotificationTemplate {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationTemplate::OrderPlaced => "order-placed",
            NotificationTemplate::ResetPassword => "reset-password",
            NotificationTemplate::Feed => FEED_CHANNEL,
            NotificationTemplate::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for NotificationTemplate {
    fn from(tag: &str) -> Self {
        match tag {
            "order-placed" => NotificationTemplate::OrderPlaced,
            "reset-password" => NotificationTemplate::ResetPassword,
            FEED_CHANNEL => NotificationTemplate::Feed,
            other => NotificationTemplate::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NotificationTemplate {
    fn from(tag: String) -> Self {
        NotificationTemplate::from(tag.as_str())
    }
}

impl From<NotificationTemplate> for String {
    fn from(template: NotificationTemplate) -> Self {
        match template {
            NotificationTemplate::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NotificationTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A single instruction to deliver one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Which renderer/channel applies.
    pub template: NotificationTemplate,
    /// Recipient override. Falls back to the configured recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Payload consumed by the renderer.
    #[serde(default)]
    pub data: Value,
}

impl NotificationRequest {
    pub fn new(template: impl Into<NotificationTemplate>, data: Value) -> Self {
        Self {
            template: template.into(),
            to: None,
            data,
        }
    }

    /// Builder method to set the recipient override.
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// `data.subject` when it is a string.
    pub fn subject(&self) -> Option<String> {
        self.data
            .get("subject")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Status reported by a feed acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Success,
}

/// Synthetic acknowledgement for the feed channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedAcknowledgement {
    pub to: String,
    pub status: DeliveryStatus,
    pub data: Value,
}

/// Confirmation returned by a mail transport.
///
/// Only `id` is interpreted; everything else the provider returned is kept
/// as-is and serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReceipt {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderReceipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// Result of a dispatch call.
///
/// Serializes to `{}`, `{to, status, data}` or the provider receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationOutcome {
    /// Feed channel acknowledgement.
    Acknowledged(FeedAcknowledgement),
    /// Email handed to the transport.
    Sent(ProviderReceipt),
    /// Email gate disabled or template not recognized.
    Skipped {},
}

impl NotificationOutcome {
    pub fn skipped() -> Self {
        NotificationOutcome::Skipped {}
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, NotificationOutcome::Skipped {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_parsing() {
        assert_eq!(NotificationTemplate::from("order-placed"), NotificationTemplate::OrderPlaced);
        assert_eq!(NotificationTemplate::from("reset-password"), NotificationTemplate::ResetPassword);
        assert_eq!(NotificationTemplate::from("feed"), NotificationTemplate::Feed);
        assert_eq!(
            NotificationTemplate::from("Feed"),
            NotificationTemplate::Unknown("Feed".to_string())
        );
    }

    #[test]
    fn test_unknown_template_keeps_raw_tag() {
        let request: NotificationRequest =
            serde_json::from_value(json!({"template": "shipment-created", "data": {}})).unwrap();
        assert_eq!(request.template.to_string(), "shipment-created");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"template": "shipment-created", "data": {}})
        );
    }

    #[test]
    fn test_request_defaults() {
        let request: NotificationRequest =
            serde_json::from_value(json!({"template": "feed"})).unwrap();
        assert_eq!(request.to, None);
        assert_eq!(request.data, Value::Null);
        assert_eq!(request.subject(), None);
    }

    #[test]
    fn test_subject_ignores_non_string() {
        let request = NotificationRequest::new("order-placed", json!({"subject": 42}));
        assert_eq!(request.subject(), None);

        let request = NotificationRequest::new("order-placed", json!({"subject": "Thanks"}));
        assert_eq!(request.subject().as_deref(), Some("Thanks"));
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_value(NotificationOutcome::skipped()).unwrap(), json!({}));

        let ack = NotificationOutcome::Acknowledged(FeedAcknowledgement {
            to: "ops@shop.test".to_string(),
            status: DeliveryStatus::Success,
            data: json!({"x": 1}),
        });
        assert_eq!(
            serde_json::to_value(ack).unwrap(),
            json!({"to": "ops@shop.test", "status": "success", "data": {"x": 1}})
        );
    }

    #[test]
    fn test_receipt_keeps_provider_fields() {
        let receipt: ProviderReceipt =
            serde_json::from_value(json!({"id": "4ef9a417", "object": "email"})).unwrap();
        assert_eq!(receipt.id, "4ef9a417");
        assert_eq!(
            serde_json::to_value(NotificationOutcome::Sent(receipt)).unwrap(),
            json!({"id": "4ef9a417", "object": "email"})
        );
    }
}

//! Notifications Domain
//!
//! Routes notification requests coming from the commerce platform's
//! workflow/event engine either to a local feed acknowledgement or to a
//! transactional email.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐
//! │   Event layer / HTTP   │  ← send / send_notification
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │ NotificationDispatcher │  ← feed short-circuit, template routing, email gate
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │     TemplateEngine     │  ← order-placed, reset-password (Handlebars)
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │     EmailProvider      │  ← Resend, SMTP
//! └────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_notifications::{
//!     ModuleOptions, NotificationDispatcher, NotificationProvider, NotificationRequest,
//!     TemplateEngine,
//!     providers::{ResendConfig, ResendProvider},
//! };
//!
//! // Options are validated before the transport exists
//! let options = ModuleOptions::from_env()?;
//! let provider = ResendProvider::new(ResendConfig::new(options.api_key()));
//! let dispatcher = NotificationDispatcher::new(options, provider, TemplateEngine::new()?);
//!
//! dispatcher
//!     .send(NotificationRequest::new("reset-password", json!({"url": url, "subject": "Reset"})))
//!     .await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod models;
pub mod options;
pub mod providers;
pub mod templates;

// Re-export commonly used types
pub use dispatcher::{NotificationDispatcher, NotificationProvider};
pub use error::{NotificationError, NotificationResult};
pub use models::{
    DeliveryStatus, FeedAcknowledgement, NotificationOutcome, NotificationRequest,
    NotificationTemplate, ProviderReceipt,
};
pub use options::{EnableFlag, ModuleOptions, RawModuleOptions};
pub use providers::{EmailContent, EmailProvider, ResendProvider, SmtpProvider};
pub use templates::TemplateEngine;

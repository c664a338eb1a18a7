//! Error types for the notifications domain.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur in the notifications domain.
///
/// A disabled email gate and an unrecognized template are not errors; the
/// dispatcher reports both as a skipped outcome.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Required provider option missing or empty. Only raised at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The mail transport rejected or failed the send. Carries the transport's
    /// message as-is.
    #[error("Email provider error: {0}")]
    ProviderSend(String),

    /// Template registration or rendering error.
    #[error("Template rendering error: {0}")]
    Template(String),
}

impl NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::ProviderSend(_) => StatusCode::BAD_GATEWAY,
            NotificationError::Configuration(_) | NotificationError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            NotificationError::Configuration(_) => "ConfigurationError",
            NotificationError::ProviderSend(_) => "ProviderSendError",
            NotificationError::Template(_) => "TemplateError",
        }
    }
}

impl From<handlebars::RenderError> for NotificationError {
    fn from(err: handlebars::RenderError) -> Self {
        NotificationError::Template(err.to_string())
    }
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::ProviderSend(err.to_string())
    }
}

/// JSON body returned for failed dispatches.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(status = %status, error = %self, "Notification request failed");

        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

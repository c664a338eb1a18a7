//! HTTP entry points for the platform's notification module.

use crate::dispatcher::NotificationProvider;
use crate::error::NotificationResult;
use crate::models::{NotificationOutcome, NotificationRequest};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde_json::Value;
use std::sync::Arc;

/// Dispatch a request keyed by its template.
pub async fn send<D: NotificationProvider + 'static>(
    State(dispatcher): State<Arc<D>>,
    Json(request): Json<NotificationRequest>,
) -> NotificationResult<Json<NotificationOutcome>> {
    let outcome = dispatcher.send(request).await?;
    Ok(Json(outcome))
}

/// Dispatch by event name; the body is the raw event payload.
pub async fn send_event<D: NotificationProvider + 'static>(
    State(dispatcher): State<Arc<D>>,
    Path(event): Path<String>,
    Json(data): Json<Value>,
) -> NotificationResult<Json<NotificationOutcome>> {
    let outcome = dispatcher.send_notification(&event, data, None).await?;
    Ok(Json(outcome))
}

/// Routes, relative to wherever the caller nests them:
///
/// - `POST /send`
/// - `POST /events/{event}`
pub fn router<D: NotificationProvider + 'static>(dispatcher: Arc<D>) -> Router {
    Router::new()
        .route("/send", post(send::<D>))
        .route("/events/{event}", post(send_event::<D>))
        .with_state(dispatcher)
}

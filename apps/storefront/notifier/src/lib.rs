//! Storefront Notifier Service
//!
//! HTTP front for the notification dispatcher, called by the commerce
//! platform's notification module.
//!
//! ## Architecture
//!
//! ```text
//! Platform event layer
//!   ↓ POST /notifications/send, /notifications/events/{event}
//! NotificationDispatcher
//!   ↓ (feed → acknowledgement, email → templates + gate)
//! EmailProvider (Resend in production, SMTP/Mailpit in development)
//! ```
//!
//! ## Endpoints
//!
//! - `/health`: liveness
//! - `/ready`: mail transport health check
//! - `/notifications/*`: dispatch

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::{AppInfo, Environment, FromEnv, app_info, server::ServerConfig};
use domain_notifications::{
    EmailProvider, ModuleOptions, NotificationDispatcher, ResendProvider, SmtpProvider,
    TemplateEngine, handlers, providers::ResendConfig,
};
use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    name: &'static str,
    version: &'static str,
}

async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

async fn ready_handler<P: EmailProvider + 'static>(
    State(dispatcher): State<Arc<NotificationDispatcher<P>>>,
) -> (StatusCode, Json<Value>) {
    let transport = dispatcher.provider().name();
    match dispatcher.provider().health_check().await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({"status": "ready", "transport": transport})),
        ),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "not ready", "transport": transport})),
        ),
        Err(e) => {
            warn!(transport = %transport, error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "not ready", "transport": transport, "error": e.to_string()})),
            )
        }
    }
}

/// Assemble the full router around a dispatcher.
pub fn app<P: EmailProvider + 'static>(dispatcher: NotificationDispatcher<P>, app_info: AppInfo) -> Router {
    let dispatcher = Arc::new(dispatcher);

    let ready = Router::new()
        .route("/ready", get(ready_handler::<P>))
        .with_state(Arc::clone(&dispatcher));
    let health = Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info);

    Router::new()
        .nest("/notifications", handlers::router(dispatcher))
        .merge(ready)
        .merge(health)
        .layer(TraceLayer::new_for_http())
}

async fn serve<P: EmailProvider + 'static>(
    dispatcher: NotificationDispatcher<P>,
    server_config: &ServerConfig,
    app_info: AppInfo,
) -> Result<()> {
    info!(transport = dispatcher.provider().name(), "Mail transport selected");

    let addr = server_config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind notifier to {}", addr))?;
    info!(address = %addr, "Notifier listening");

    axum::serve(listener, app(dispatcher, app_info))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Notifier server failed")?;

    info!("Storefront notifier stopped");
    Ok(())
}

/// Run the notifier
///
/// 1. Sets up structured logging (JSON in production, pretty in development)
/// 2. Validates the provider options; a missing key aborts startup before any
///    transport is built
/// 3. Selects the mail transport (Resend in production, SMTP in development)
/// 4. Serves HTTP until SIGINT/SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Server or provider configuration is invalid
/// - Templates fail to register
/// - The listener cannot bind or the server fails
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let app_info = app_info!();
    info!(name = %app_info.name, version = %app_info.version, environment = ?environment, "Starting storefront notifier");

    let server_config = ServerConfig::from_env().wrap_err("Failed to load server configuration")?;
    let options = ModuleOptions::from_env().wrap_err("Invalid notification provider options")?;
    let templates = TemplateEngine::new().wrap_err("Failed to initialize template engine")?;

    match environment {
        Environment::Production => {
            let provider = ResendProvider::new(ResendConfig::with_env_api_url(options.api_key()));
            serve(NotificationDispatcher::new(options, provider, templates), &server_config, app_info).await
        }
        Environment::Development => {
            let provider = SmtpProvider::mailhog()
                .wrap_err("SMTP configuration error. Ensure SMTP_HOST and SMTP_PORT are reachable")?;
            serve(NotificationDispatcher::new(options, provider, templates), &server_config, app_info).await
        }
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }
}

//! Router construction and the listening loop.

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{RelayConfig, WebhookConfig};
use crate::error::RelayError;
use crate::handler::{health, send_message};
use crate::webhook::{HttpWebhookClient, WebhookClient};

#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when no webhook URL is configured
    pub webhook: Option<Arc<dyn WebhookClient>>,
}

impl AppState {
    pub fn new(webhook: Option<Arc<dyn WebhookClient>>) -> Self {
        Self { webhook }
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self, RelayError> {
        let webhook = HttpWebhookClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn WebhookClient>);
        if webhook.is_none() {
            warn!("WEBHOOK_URL is not set; sendMessage requests will fail until it is configured");
        }
        Ok(Self { webhook })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sendMessage", any(send_message))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.addr` and serve until the process is stopped.
pub async fn serve(config: RelayConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config.webhook)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        addr = %listener.local_addr()?,
        timeout_ms = config.webhook.timeout.as_millis() as u64,
        retry_attempts = config.webhook.retry.attempts,
        "Relay listening"
    );
    axum::serve(listener, router(state)).await
}

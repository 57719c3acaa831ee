//! Outbound call to the automation webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WebhookConfig;
use crate::error::RelayError;
use crate::retry::RetryPolicy;

/// Body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub chat_id: String,
    pub message: String,
    pub user_id: String,
    /// ISO-8601, UTC
    pub timestamp: String,
}

#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Deliver `payload` and return the webhook's JSON answer.
    async fn deliver(&self, payload: &WebhookPayload) -> Result<Value, RelayError>;
}

pub struct HttpWebhookClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    user_agent: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpWebhookClient {
    /// `None` when no webhook URL is configured.
    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>, RelayError> {
        let Some(url) = config.url.clone() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RelayError::Internal(format!("Could not build HTTP client: {}", e)))?;
        Ok(Some(Self {
            client,
            url,
            api_key: config.api_key.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            retry: config.retry,
        }))
    }

    async fn post_once(&self, payload: &WebhookPayload) -> Result<Value, RelayError> {
        let mut request = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(USER_AGENT, &self.user_agent)
            .json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            return Err(RelayError::WebhookFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&bytes).map_err(|e| RelayError::InvalidResponse(e.to_string()))
    }

    fn classify(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::Timeout(self.timeout.as_millis() as u64)
        } else if error.is_builder() {
            RelayError::Internal(error.to_string())
        } else {
            RelayError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<Value, RelayError> {
        let mut retry = 0;
        loop {
            match self.post_once(payload).await {
                Ok(value) => {
                    debug!(chat_id = %payload.chat_id, attempt = retry + 1, "Webhook delivered");
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && retry < self.retry.attempts => {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    warn!(
                        chat_id = %payload.chat_id,
                        attempt = retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Webhook call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

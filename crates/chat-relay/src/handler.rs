//! The `sendMessage` action handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use chat_types::chat::is_blank;
use chat_types::envelope::{ActionRequest, RelayResponse, RelaySuccess, SEND_MESSAGE_ACTION};
use crate::error::RelayError;
use crate::server::AppState;
use crate::webhook::{WebhookClient, WebhookPayload};

/// Validate one action request and forward it to the webhook.
///
/// Checks run in a fixed order and the first failure wins: method, body,
/// action name, caller identity, webhook configuration, input. The webhook
/// is only called once all of them pass.
pub async fn relay(
    method: &Method,
    body: &[u8],
    webhook: Option<&dyn WebhookClient>,
) -> Result<RelaySuccess, RelayError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed(method.to_string()));
    }

    let request: ActionRequest =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidBody(e.to_string()))?;

    if request.action.name != SEND_MESSAGE_ACTION {
        return Err(RelayError::InvalidAction(request.action.name));
    }

    let user_id = request
        .session_variables
        .caller_id()
        .ok_or(RelayError::Unauthorized)?
        .to_string();

    let webhook = webhook
        .ok_or_else(|| RelayError::Configuration("WEBHOOK_URL is not set".to_string()))?;

    let input = request
        .input
        .ok_or_else(|| RelayError::InvalidInput("Missing action input".to_string()))?;
    if is_blank(&input.chat_id) {
        return Err(RelayError::InvalidInput("chat_id is required".to_string()));
    }
    if is_blank(&input.message) {
        return Err(RelayError::InvalidInput("message cannot be empty".to_string()));
    }

    let payload = WebhookPayload {
        chat_id: input.chat_id,
        message: input.message,
        user_id,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let data = webhook.deliver(&payload).await?;
    info!(chat_id = %payload.chat_id, user_id = %payload.user_id, "Message relayed");
    Ok(RelaySuccess::new(data))
}

/// Route handler; accepts any method so wrong verbs get the relay's own envelope.
pub async fn send_message(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("send_message", %request_id);

    async move {
        match relay(&method, &body, state.webhook.as_deref()).await {
            Ok(success) => (StatusCode::OK, Json(RelayResponse::Success(success))).into_response(),
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    error!(status = status.as_u16(), error = %e, "sendMessage failed");
                } else {
                    warn!(status = status.as_u16(), error = %e, "sendMessage rejected");
                }
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn health() -> &'static str {
    "OK"
}

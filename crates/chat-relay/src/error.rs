use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use chat_types::envelope::RelayFailure;

/// Every way a relay request can fail.
///
/// `Display` is the raw detail; [`RelayError::summary`] is the stable
/// human-readable message callers match on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("Method {0} is not allowed; use POST")]
    MethodNotAllowed(String),

    #[error("Request body is not a valid action envelope: {0}")]
    InvalidBody(String),

    #[error("Unknown action '{0}'")]
    InvalidAction(String),

    #[error("Missing x-hasura-user-id session variable")]
    Unauthorized,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Configuration(String),

    #[error("No response from webhook within {0}ms")]
    Timeout(u64),

    #[error("{0}")]
    Network(String),

    #[error("Webhook responded with HTTP {status}: {body}")]
    WebhookFailed { status: u16, body: String },

    #[error("Webhook body is not JSON: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidBody(_)
            | RelayError::InvalidAction(_)
            | RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            // upstream status is reported in `details` only
            RelayError::WebhookFailed { .. } => StatusCode::BAD_GATEWAY,
            RelayError::Configuration(_)
            | RelayError::InvalidResponse(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed(_) => "Method not allowed",
            RelayError::InvalidBody(_) => "Invalid request body",
            RelayError::InvalidAction(_) => "Invalid action",
            RelayError::Unauthorized => "Unauthorized",
            RelayError::InvalidInput(_) => "Invalid input",
            RelayError::Configuration(_) => "Webhook is not configured",
            RelayError::Timeout(_) => "Webhook request timed out",
            RelayError::Network(_) => "Network error occurred",
            RelayError::WebhookFailed { .. } => "n8n webhook failed",
            RelayError::InvalidResponse(_) => "Invalid response from webhook",
            RelayError::Internal(_) => "Internal server error",
        }
    }

    /// Network failures and upstream 5xx may succeed on a later attempt.
    /// An upstream 504 is a timeout and, like our own, is not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            RelayError::Network(_) => true,
            RelayError::WebhookFailed { status, .. } => *status >= 500 && *status != 504,
            _ => false,
        }
    }

    pub fn to_failure(&self) -> RelayFailure {
        RelayFailure {
            error: self.summary().to_string(),
            details: self.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_failure())).into_response()
    }
}

//! Wire shapes exchanged with the `sendMessage` action.
//!
//! The GraphQL engine posts an [`ActionRequest`] to the relay; the relay
//! answers with a [`RelayResponse`]. The client sees the action's result as a
//! [`SendMessageOutput`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the only action the relay accepts.
pub const SEND_MESSAGE_ACTION: &str = "sendMessage";

/// Inbound action envelope posted by the GraphQL engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionInfo,
    #[serde(default)]
    pub input: Option<SendMessageInput>,
    #[serde(default)]
    pub session_variables: SessionVariables,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageInput {
    pub chat_id: String,
    pub message: String,
}

/// Session variables forwarded by the engine for the calling user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionVariables {
    #[serde(rename = "x-hasura-user-id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "x-hasura-role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl SessionVariables {
    /// The authenticated user id, if present and non-blank.
    pub fn caller_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Response body returned by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Success(RelaySuccess),
    Failure(RelayFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySuccess {
    pub success: bool,
    pub data: Value,
}

impl RelaySuccess {
    pub fn new(data: Value) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFailure {
    /// Stable human-readable summary
    pub error: String,
    /// Raw error message
    pub details: String,
}

/// Result of the `sendMessage` mutation as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageOutput {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
}

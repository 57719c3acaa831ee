//! `graphql-transport-ws` frames.
//!
//! Only the subset a single-subscription client needs. Frame handling is
//! kept free of any socket so it can be tested natively.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use chat_types::{ChatError, Result, chat::Message};
use crate::graphql::decode_response;
use crate::operations::MessagesData;

/// WebSocket sub-protocol name sent during the handshake.
pub const SUBPROTOCOL: &str = "graphql-transport-ws";

/// Id of the one subscription each socket carries.
pub const SUBSCRIPTION_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    ConnectionInit {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Subscribe {
        id: String,
        payload: Value,
    },
    Pong {},
    Complete {
        id: String,
    },
}

impl ClientFrame {
    /// Handshake frame; the bearer token travels as a header in the payload.
    pub fn connection_init(token: Option<&str>) -> Self {
        let payload = token.map(|token| {
            json!({ "headers": { "Authorization": format!("Bearer {}", token) } })
        });
        ClientFrame::ConnectionInit { payload }
    }

    pub fn subscribe(query: &str, variables: Value) -> Self {
        ClientFrame::Subscribe {
            id: SUBSCRIPTION_ID.to_string(),
            payload: json!({ "query": query, "variables": variables }),
        }
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    ConnectionAck {},
    Next {
        id: String,
        payload: Value,
    },
    Error {
        id: String,
        #[serde(default)]
        payload: Value,
    },
    Complete {
        id: String,
    },
    Ping {},
    Pong {},
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ChatError::Graphql(format!("Unexpected subscription frame: {}", e)))
    }
}

/// What the subscription loop should do with one server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    /// A full message list for the subscribed chat
    Snapshot(Vec<Message>),
    /// A `next` payload that could not be decoded; later frames may still arrive
    Failed(ChatError),
    /// The server rejected the subscription; no more frames follow
    Rejected(ChatError),
    /// The server ended the subscription
    Finished,
    /// Answer a keep-alive
    Pong,
    Ignore,
}

/// Map a frame received after `connection_ack` to an action.
pub fn interpret(frame: ServerFrame) -> FrameAction {
    match frame {
        ServerFrame::Next { id, payload } if id == SUBSCRIPTION_ID => {
            match decode_response::<MessagesData>(payload) {
                Ok(data) => FrameAction::Snapshot(data.messages),
                Err(e) => FrameAction::Failed(e),
            }
        }
        ServerFrame::Error { id, payload } if id == SUBSCRIPTION_ID => {
            FrameAction::Rejected(ChatError::Graphql(error_messages(&payload)))
        }
        ServerFrame::Complete { id } if id == SUBSCRIPTION_ID => FrameAction::Finished,
        ServerFrame::Ping {} => FrameAction::Pong,
        _ => FrameAction::Ignore,
    }
}

/// `error` frames carry a list of GraphQL errors.
fn error_messages(payload: &Value) -> String {
    let messages: Vec<&str> = payload
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["message"].as_str())
                .collect()
        })
        .unwrap_or_default();
    if messages.is_empty() {
        "Subscription failed".to_string()
    } else {
        messages.join("; ")
    }
}

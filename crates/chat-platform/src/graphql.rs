//! Minimal GraphQL-over-HTTP client.
//!
//! Uses browser `fetch()` via gloo-net. The bearer token is read from a
//! [`TokenProvider`] on every request so a refreshed session is picked up
//! without rebuilding the client.

use std::rc::Rc;

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use chat_types::{ChatError, Result};

/// Current access token, if signed in.
pub type TokenProvider = Rc<dyn Fn() -> Option<String>>;

#[derive(Clone)]
pub struct GraphqlClient {
    url: String,
    token: TokenProvider,
}

impl GraphqlClient {
    pub fn new(url: impl Into<String>, token: TokenProvider) -> Self {
        Self {
            url: url.into(),
            token,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run a query or mutation and decode its `data` into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });

        let mut request = Request::post(&self.url).header("Content-Type", "application/json");
        if let Some(token) = (self.token)() {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .json(&body)
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChatError::Upstream { status, body: text });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Serialization(e.to_string()))?;
        decode_response(payload)
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Decode a `{data, errors}` response body.
///
/// Any entry in `errors` fails the whole operation.
pub fn decode_response<T: DeserializeOwned>(payload: Value) -> Result<T> {
    let response: GraphqlResponse = serde_json::from_value(payload)?;
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ChatError::Graphql(messages.join("; ")));
    }
    match response.data {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
        _ => Err(ChatError::Graphql("Response contained no data".to_string())),
    }
}

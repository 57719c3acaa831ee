use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8080/v1/graphql";
pub const DEFAULT_AUTH_URL: &str = "http://localhost:4000/v1";

/// Endpoints of the managed backend used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// GraphQL endpoint for queries and mutations
    pub graphql_url: String,
    /// GraphQL endpoint for live subscriptions
    pub graphql_ws_url: String,
    /// Base URL of the auth service
    pub auth_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPHQL_URL, None, DEFAULT_AUTH_URL)
    }
}

impl ClientConfig {
    /// Build a config; the WebSocket URL is derived from the HTTP one when absent.
    pub fn new(graphql_url: &str, graphql_ws_url: Option<&str>, auth_url: &str) -> Self {
        let graphql_url = graphql_url.trim_end_matches('/').to_string();
        let graphql_ws_url = graphql_ws_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| derive_ws_url(&graphql_url));
        Self {
            graphql_url,
            graphql_ws_url,
            auth_url: auth_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read endpoint overrides baked in at compile time.
    ///
    /// `CHAT_GRAPHQL_URL`, `CHAT_GRAPHQL_WS_URL` and `CHAT_AUTH_URL`.
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("CHAT_GRAPHQL_URL").unwrap_or(DEFAULT_GRAPHQL_URL),
            option_env!("CHAT_GRAPHQL_WS_URL"),
            option_env!("CHAT_AUTH_URL").unwrap_or(DEFAULT_AUTH_URL),
        )
    }
}

/// `http://` → `ws://`, `https://` → `wss://`
pub fn derive_ws_url(http_url: &str) -> String {
    if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        http_url.to_string()
    }
}

//! [`AuthPort`] against the Nhost auth service REST API.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use chat_core::ports::AuthPort;
use chat_types::{ChatError, Result, session::AuthSession};

pub struct NhostAuth {
    base_url: String,
}

impl NhostAuth {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: Value, bearer: Option<&str>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = Request::post(&url).header("Content-Type", "application/json");
        if let Some(token) = bearer {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .json(&body)
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ChatError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(auth_error(status, &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

#[async_trait(?Send)]
impl AuthPort for NhostAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = self
            .post(
                "/signin/email-password",
                json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        session_from_body(body)?
            .ok_or_else(|| ChatError::Auth("Sign-in did not return a session".to_string()))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>> {
        let body = self
            .post(
                "/signup/email-password",
                json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        session_from_body(body)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        let body = self
            .post("/token", json!({ "refreshToken": refresh_token }), None)
            .await?;
        // /token answers with the bare session
        Ok(serde_json::from_value(body)?)
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<()> {
        self.post(
            "/signout",
            json!({ "refreshToken": session.refresh_token }),
            Some(&session.access_token),
        )
        .await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct SessionEnvelope {
    #[serde(default)]
    session: Option<AuthSession>,
}

/// Read `{session}` from a sign-in/sign-up response.
///
/// A null session means the account exists but awaits verification.
pub fn session_from_body(body: Value) -> Result<Option<AuthSession>> {
    let envelope: SessionEnvelope = serde_json::from_value(body)?;
    Ok(envelope.session)
}

/// Map a failed auth response to [`ChatError::Auth`], preferring the
/// service's own message.
pub fn auth_error(status: u16, body: &str) -> ChatError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Auth request failed with HTTP {}", status));
    ChatError::Auth(message)
}

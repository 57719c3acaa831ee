use serde::{Deserialize, Serialize};

/// The signed-in identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
}

/// An authenticated session issued by the auth provider.
///
/// Field names follow the provider's camelCase wire format so the same
/// shape is used both on the wire and when persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    /// Seconds until the access token expires
    #[serde(default)]
    pub access_token_expires_in: u64,
    pub refresh_token: String,
    pub user: User,
}

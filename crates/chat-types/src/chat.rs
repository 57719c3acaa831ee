use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
///
/// User messages are written by the send action; assistant messages are
/// written later by the external automation and only ever observed through
/// the live message feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A conversation owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning user id (`user_id` column)
    #[serde(rename = "user_id")]
    pub owner: String,
}

/// A single immutable message in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Author user id (`user_id` column)
    #[serde(rename = "user_id")]
    pub author: String,
    pub chat_id: String,
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Returns true when the text is empty after trimming.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

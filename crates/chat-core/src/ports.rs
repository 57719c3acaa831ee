//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use std::time::Duration;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use futures::Stream;
use chat_types::{
    Result,
    chat::{Chat, Message},
    envelope::SendMessageOutput,
    session::AuthSession,
};

/// Live feed of full message-list snapshots for one chat.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Vec<Message>>>>>;

// ─── Backend Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ChatBackend {
    /// Chats owned by `owner_id`, most recently updated first
    async fn list_chats(&self, owner_id: &str) -> Result<Vec<Chat>>;

    /// Insert a chat and return the stored record
    async fn create_chat(&self, title: &str, owner_id: &str) -> Result<Chat>;

    /// Invoke the relay-backed send action
    async fn send_message(&self, chat_id: &str, content: &str) -> Result<SendMessageOutput>;

    /// Subscribe to the ordered message list of a chat.
    ///
    /// Every item is the complete list (creation order), not a delta.
    /// Dropping the stream ends the subscription.
    fn subscribe_messages(&self, chat_id: &str) -> MessageStream;
}

// ─── Auth Port ───────────────────────────────────────────────

#[async_trait(?Send)]
pub trait AuthPort {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Returns `None` when the account was created but needs verification
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>>;

    /// Exchange a refresh token for a fresh session
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession>;

    async fn sign_out(&self, session: &AuthSession) -> Result<()>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Task Port ───────────────────────────────────────────────

/// Runs background work (message feeds, list reloads) on the local executor.
pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Wall-clock delays for background work (session refresh).
pub trait Timer {
    /// Resolves once `delay` has passed.
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

use serde::{Deserialize, Serialize};

/// Events emitted by the chat store and the auth gate.
/// The UI drains these each frame for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A chat list load was issued
    ChatsLoading,

    /// The chat list cache was replaced by a load response
    ChatsLoaded { count: usize },

    /// A chat list load failed; the previous list stays visible
    ChatsLoadFailed { error: String },

    /// A chat was created and became the current chat
    ChatCreated { chat_id: String },

    /// Chat creation failed; selection is unchanged
    ChatCreateFailed { error: String },

    /// The current chat changed (None when cleared)
    ChatSelected { chat_id: Option<String> },

    /// The message list for the current chat was replaced by a snapshot
    MessagesReplaced { chat_id: String, count: usize },

    /// The live message feed reported an error
    MessageFeedFailed { chat_id: String, error: String },

    /// The send action completed
    MessageSent { chat_id: String },

    /// The send action failed; `retryable` when resending as-is may succeed
    MessageSendFailed { chat_id: String, error: String, retryable: bool },

    /// The signed-in user changed (None after sign-out)
    AuthChanged { user_id: Option<String> },

    /// Sign-up succeeded but the account needs email verification
    SignUpPending { email: String },

    /// A sign-in, sign-up or sign-out attempt failed
    AuthFailed { error: String },
}

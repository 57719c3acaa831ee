//! UI-level state that drives rendering.
//! Holds only what the store does not: form inputs, pending flags and
//! inline errors. Updated each frame by draining the EventBus.

use chat_types::{
    chat::{is_blank, Chat},
    event::StoreEvent,
};

/// Something the user asked for; dispatched by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    SignOut,
    SelectChat(Chat),
    CreateChat { title: String },
    SendMessage { chat_id: String, content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub busy: bool,
    pub error: Option<String>,
    /// Shown after a sign-up that needs email verification
    pub notice: Option<String>,
}

#[derive(Debug, Default)]
pub struct Composer {
    pub text: String,
    pub sending: bool,
    /// Chat the pending send was issued for
    pub target: Option<String>,
    pub error: Option<String>,
}

impl Composer {
    fn awaits(&self, chat_id: &str) -> bool {
        self.sending && self.target.as_deref() == Some(chat_id)
    }
}

#[derive(Debug, Default)]
pub struct NewChatForm {
    pub open: bool,
    pub title: String,
    pub creating: bool,
    pub error: Option<String>,
}

/// State visible to UI panels
#[derive(Debug)]
pub struct UiState {
    pub auth: AuthForm,
    pub composer: Composer,
    pub new_chat: NewChatForm,
    /// Last chat list failure, cleared by the next successful load
    pub list_error: Option<String>,
    /// Last live-feed failure for the current chat
    pub feed_error: Option<String>,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            auth: AuthForm::default(),
            composer: Composer::default(),
            new_chat: NewChatForm::default(),
            list_error: None,
            feed_error: None,
            status_text: "Ready".to_string(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<StoreEvent>) {
        for event in events {
            match event {
                StoreEvent::ChatsLoading => {
                    self.status_text = "Loading chats...".to_string();
                }
                StoreEvent::ChatsLoaded { count } => {
                    self.list_error = None;
                    self.status_text = format!("{} chats", count);
                }
                StoreEvent::ChatsLoadFailed { error } => {
                    self.status_text = format!("Error: {}", error);
                    self.list_error = Some(error);
                }
                StoreEvent::ChatCreated { .. } => {
                    self.new_chat = NewChatForm::default();
                }
                StoreEvent::ChatCreateFailed { error } => {
                    self.new_chat.creating = false;
                    self.new_chat.error = Some(error);
                }
                StoreEvent::ChatSelected { chat_id } => {
                    let left_pending = self.composer.sending
                        && self.composer.target.is_some()
                        && self.composer.target != chat_id;
                    if left_pending {
                        // the pending send's outcome no longer belongs here
                        self.composer = Composer::default();
                    }
                    self.composer.error = None;
                    self.feed_error = None;
                }
                StoreEvent::MessagesReplaced { .. } => {
                    self.feed_error = None;
                }
                StoreEvent::MessageFeedFailed { error, .. } => {
                    self.status_text = format!("Error: {}", error);
                    self.feed_error = Some(error);
                }
                StoreEvent::MessageSent { chat_id } => {
                    if self.composer.awaits(&chat_id) {
                        self.composer = Composer::default();
                    }
                    self.status_text = "Ready".to_string();
                }
                StoreEvent::MessageSendFailed { chat_id, error, .. }
                    if !self.composer.awaits(&chat_id) =>
                {
                    self.status_text = format!("Error: {}", error);
                }
                StoreEvent::MessageSendFailed { error, retryable, .. } => {
                    // the typed text stays so it can be resent
                    self.composer.sending = false;
                    self.composer.target = None;
                    self.composer.error = Some(if retryable {
                        format!("{} Please try again.", error)
                    } else {
                        error
                    });
                }
                StoreEvent::AuthChanged { user_id } => {
                    self.auth.busy = false;
                    self.auth.password.clear();
                    self.auth.error = None;
                    if user_id.is_some() {
                        self.auth.notice = None;
                    } else {
                        self.composer = Composer::default();
                        self.new_chat = NewChatForm::default();
                        self.list_error = None;
                        self.feed_error = None;
                        self.status_text = "Ready".to_string();
                    }
                }
                StoreEvent::SignUpPending { email } => {
                    self.auth.busy = false;
                    self.auth.password.clear();
                    self.auth.error = None;
                    self.auth.mode = AuthMode::SignIn;
                    self.auth.notice = Some(format!(
                        "Check {} for a verification link, then sign in.",
                        email
                    ));
                }
                StoreEvent::AuthFailed { error } => {
                    self.auth.busy = false;
                    self.auth.error = Some(error);
                }
            }
        }
    }

    pub fn can_send(&self) -> bool {
        !self.composer.sending && !is_blank(&self.composer.text)
    }

    /// Start a send for `chat_id`; `None` while blank or already sending.
    pub fn begin_send(&mut self, chat_id: &str) -> Option<UiAction> {
        if !self.can_send() {
            return None;
        }
        self.composer.sending = true;
        self.composer.target = Some(chat_id.to_string());
        self.composer.error = None;
        Some(UiAction::SendMessage {
            chat_id: chat_id.to_string(),
            content: self.composer.text.trim().to_string(),
        })
    }

    pub fn can_create(&self) -> bool {
        !self.new_chat.creating && !is_blank(&self.new_chat.title)
    }

    pub fn open_new_chat(&mut self) {
        self.new_chat = NewChatForm {
            open: true,
            ..NewChatForm::default()
        };
    }

    pub fn close_new_chat(&mut self) {
        if !self.new_chat.creating {
            self.new_chat = NewChatForm::default();
        }
    }

    pub fn begin_create(&mut self) -> Option<UiAction> {
        if !self.can_create() {
            return None;
        }
        self.new_chat.creating = true;
        self.new_chat.error = None;
        Some(UiAction::CreateChat {
            title: self.new_chat.title.trim().to_string(),
        })
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth.mode = match self.auth.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.auth.error = None;
    }

    pub fn can_submit_auth(&self) -> bool {
        !self.auth.busy && !is_blank(&self.auth.email) && !self.auth.password.is_empty()
    }

    pub fn begin_auth(&mut self) -> Option<UiAction> {
        if !self.can_submit_auth() {
            return None;
        }
        self.auth.busy = true;
        self.auth.error = None;
        self.auth.notice = None;
        let email = self.auth.email.trim().to_string();
        let password = self.auth.password.clone();
        Some(match self.auth.mode {
            AuthMode::SignIn => UiAction::SignIn { email, password },
            AuthMode::SignUp => UiAction::SignUp { email, password },
        })
    }

    pub fn is_busy(&self) -> bool {
        self.composer.sending || self.new_chat.creating || self.auth.busy
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

//! Chat store: the client's view of chats and the current conversation.
//!
//! Three read views are kept consistent here:
//! 1. the chat list cache (loaded per owner, newest-updated first)
//! 2. the current chat
//! 3. the live message list of the current chat
//!
//! Writes (create chat, send message) go through the backend port. The
//! message list is only ever replaced by snapshots from the live feed of the
//! current chat; each feed is tagged with a generation so that a snapshot
//! from a chat the user already left can never land in the visible list.

use std::cell::RefCell;
use std::rc::Rc;

use futures::stream::{abortable, AbortHandle, Abortable};
use futures::StreamExt;

use chat_types::{
    ChatError, Result,
    chat::{Chat, Message},
    envelope::SendMessageOutput,
    event::StoreEvent,
};
use crate::event_bus::EventBus;
use crate::ports::{ChatBackend, MessageStream, TaskSpawner};

/// Load state of the chat list cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// Identifies one live feed: the chat it targets and the selection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedKey {
    pub(crate) chat_id: String,
    pub(crate) generation: u64,
}

struct ActiveFeed {
    key: FeedKey,
    abort: AbortHandle,
}

#[derive(Default)]
struct StoreState {
    owner: Option<String>,
    chats: Vec<Chat>,
    list_status: ListStatus,
    has_loaded: bool,
    load_seq: u64,
    /// Ids created locally that no list response has returned yet, newest first
    local_created: Vec<String>,
    current: Option<Chat>,
    messages: Vec<Message>,
    awaiting_snapshot: bool,
    feed: Option<ActiveFeed>,
    generation: u64,
    last_error: Option<ChatError>,
}

/// Shared chat state: clone-cheap via Rc.
#[derive(Clone)]
pub struct ChatStore {
    backend: Rc<dyn ChatBackend>,
    spawner: Rc<dyn TaskSpawner>,
    bus: EventBus,
    state: Rc<RefCell<StoreState>>,
}

impl ChatStore {
    pub fn new(backend: Rc<dyn ChatBackend>, spawner: Rc<dyn TaskSpawner>, bus: EventBus) -> Self {
        Self {
            backend,
            spawner,
            bus,
            state: Rc::new(RefCell::new(StoreState::default())),
        }
    }

    // ─── Read accessors ──────────────────────────────────────

    pub fn owner(&self) -> Option<String> {
        self.state.borrow().owner.clone()
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.state.borrow().chats.clone()
    }

    pub fn current_chat(&self) -> Option<Chat> {
        self.state.borrow().current.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn list_status(&self) -> ListStatus {
        self.state.borrow().list_status
    }

    /// True while the list is loading or the current chat has no snapshot yet.
    pub fn is_loading(&self) -> bool {
        let s = self.state.borrow();
        s.list_status == ListStatus::Loading || s.awaiting_snapshot
    }

    pub fn is_list_loading(&self) -> bool {
        self.state.borrow().list_status == ListStatus::Loading
    }

    pub fn is_awaiting_messages(&self) -> bool {
        self.state.borrow().awaiting_snapshot
    }

    pub fn last_error(&self) -> Option<ChatError> {
        self.state.borrow().last_error.clone()
    }

    /// Chat id of the live feed, if one is attached.
    pub fn live_chat_id(&self) -> Option<String> {
        self.state
            .borrow()
            .feed
            .as_ref()
            .map(|f| f.key.chat_id.clone())
    }

    // ─── Owner ───────────────────────────────────────────────

    /// Switch the signed-in owner. Any change drops every cached view.
    pub fn set_owner(&self, owner: Option<String>) {
        {
            let s = self.state.borrow();
            if s.owner == owner {
                return;
            }
        }
        self.clear_selection();

        let mut s = self.state.borrow_mut();
        log::info!("Chat store owner changed (signed in: {})", owner.is_some());
        s.owner = owner;
        s.chats.clear();
        s.local_created.clear();
        s.list_status = ListStatus::Idle;
        s.has_loaded = false;
        // Responses to loads issued for the previous owner are discarded
        s.load_seq += 1;
        s.last_error = None;
    }

    // ─── Chat list ───────────────────────────────────────────

    /// Load the owner's chats. On failure the previous list stays in place.
    pub async fn load_chats(&self) -> Result<Vec<Chat>> {
        let (owner, seq) = {
            let mut s = self.state.borrow_mut();
            let Some(owner) = s.owner.clone() else {
                return Ok(Vec::new());
            };
            s.load_seq += 1;
            s.list_status = ListStatus::Loading;
            (owner, s.load_seq)
        };
        self.bus.emit(StoreEvent::ChatsLoading);

        let result = self.backend.list_chats(&owner).await;

        let mut s = self.state.borrow_mut();
        if s.load_seq != seq {
            log::debug!("Discarding superseded chat list response");
            return result.map(|_| s.chats.clone());
        }

        match result {
            Ok(server) => {
                let state = &mut *s;
                state.chats = merge_chat_list(&state.chats, &mut state.local_created, server);
                let fresh_current = state
                    .current
                    .as_ref()
                    .and_then(|current| state.chats.iter().find(|c| c.id == current.id))
                    .cloned();
                if fresh_current.is_some() {
                    state.current = fresh_current;
                }
                state.list_status = ListStatus::Loaded;
                state.has_loaded = true;
                state.last_error = None;
                let chats = state.chats.clone();
                drop(s);

                log::debug!("Loaded {} chats", chats.len());
                self.bus.emit(StoreEvent::ChatsLoaded { count: chats.len() });
                Ok(chats)
            }
            Err(e) => {
                log::warn!("Failed to load chats: {}", e);
                s.list_status = if s.has_loaded {
                    ListStatus::Loaded
                } else {
                    ListStatus::Idle
                };
                s.last_error = Some(e.clone());
                drop(s);

                self.bus.emit(StoreEvent::ChatsLoadFailed { error: e.to_string() });
                Err(e)
            }
        }
    }

    /// Reload the chat list in the background.
    pub fn refresh_chats(&self) {
        let store = self.clone();
        self.spawner.spawn(Box::pin(async move {
            // failures are logged and recorded by load_chats
            let _ = store.load_chats().await;
        }));
    }

    // ─── Writes ──────────────────────────────────────────────

    /// Create a chat, put it at the head of the list and select it.
    ///
    /// On failure nothing changes and the error is returned to the caller.
    pub async fn create_chat(&self, title: &str) -> Result<Chat> {
        let result = self.try_create_chat(title).await;
        match &result {
            Ok(chat) => {
                self.bus.emit(StoreEvent::ChatCreated { chat_id: chat.id.clone() });
                self.select_chat(chat.clone());
                self.refresh_chats();
            }
            Err(e) => {
                log::error!("Error creating chat: {}", e);
                self.bus.emit(StoreEvent::ChatCreateFailed { error: e.to_string() });
            }
        }
        result
    }

    async fn try_create_chat(&self, title: &str) -> Result<Chat> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::Validation("Chat title cannot be empty".to_string()));
        }
        let owner = self
            .owner()
            .ok_or_else(|| ChatError::Auth("Sign in to create a chat".to_string()))?;

        let chat = self.backend.create_chat(title, &owner).await?;

        let mut s = self.state.borrow_mut();
        if s.owner.as_deref() != Some(owner.as_str()) {
            return Err(ChatError::Auth("Signed out while creating the chat".to_string()));
        }
        prepend_chat(&mut s.chats, chat.clone());
        s.local_created.retain(|id| id != &chat.id);
        s.local_created.insert(0, chat.id.clone());
        Ok(chat)
    }

    /// Send a message through the relay-backed action.
    ///
    /// The message is not appended locally: the stored copy (and later the
    /// assistant reply) arrives through the live feed.
    pub async fn send_message(&self, chat_id: &str, content: &str) -> Result<SendMessageOutput> {
        let result = self.try_send_message(chat_id, content).await;
        match &result {
            Ok(_) => self.bus.emit(StoreEvent::MessageSent { chat_id: chat_id.to_string() }),
            Err(e) => {
                log::error!("Error sending message: {}", e);
                self.bus.emit(StoreEvent::MessageSendFailed {
                    chat_id: chat_id.to_string(),
                    error: e.to_string(),
                    retryable: e.is_transient(),
                });
            }
        }
        result
    }

    async fn try_send_message(&self, chat_id: &str, content: &str) -> Result<SendMessageOutput> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::Validation("Message cannot be empty".to_string()));
        }
        match self.current_chat() {
            None => return Err(ChatError::Validation("No chat selected".to_string())),
            Some(current) if current.id != chat_id => {
                return Err(ChatError::Validation(
                    "Message is for a chat that is no longer selected".to_string(),
                ));
            }
            Some(_) => {}
        }
        if self.owner().is_none() {
            return Err(ChatError::Auth("Sign in to send messages".to_string()));
        }

        let output = self.backend.send_message(chat_id, content).await?;
        if !output.success {
            return Err(ChatError::Upstream {
                status: 502,
                body: "The message relay reported a failure".to_string(),
            });
        }
        Ok(output)
    }

    // ─── Selection & live feed ───────────────────────────────

    /// Make `chat` current and retarget the live feed at it.
    ///
    /// The previous feed is aborted and the message list is cleared before
    /// the new feed is attached. Selecting the chat that already has a live
    /// feed only refreshes the stored record.
    pub fn select_chat(&self, chat: Chat) {
        let key = {
            let mut s = self.state.borrow_mut();
            let already_live = s
                .feed
                .as_ref()
                .is_some_and(|f| f.key.chat_id == chat.id);
            if already_live && s.current.as_ref().is_some_and(|c| c.id == chat.id) {
                s.current = Some(chat);
                return;
            }

            if let Some(feed) = s.feed.take() {
                feed.abort.abort();
            }
            s.generation += 1;
            let key = FeedKey {
                chat_id: chat.id.clone(),
                generation: s.generation,
            };
            s.current = Some(chat);
            s.messages.clear();
            s.awaiting_snapshot = true;
            key
        };

        let (stream, abort) = abortable(self.backend.subscribe_messages(&key.chat_id));
        self.state.borrow_mut().feed = Some(ActiveFeed {
            key: key.clone(),
            abort,
        });
        log::debug!("Selected chat {} (feed #{})", key.chat_id, key.generation);
        self.bus.emit(StoreEvent::ChatSelected {
            chat_id: Some(key.chat_id.clone()),
        });

        let store = self.clone();
        self.spawner.spawn(Box::pin(async move {
            store.run_feed(key, stream).await;
        }));
    }

    /// Drop the current chat and stop its live feed.
    pub fn clear_selection(&self) {
        let had_current = {
            let mut s = self.state.borrow_mut();
            if let Some(feed) = s.feed.take() {
                feed.abort.abort();
            }
            s.messages.clear();
            s.awaiting_snapshot = false;
            s.current.take().is_some()
        };
        if had_current {
            self.bus.emit(StoreEvent::ChatSelected { chat_id: None });
        }
    }

    async fn run_feed(&self, key: FeedKey, mut stream: Abortable<MessageStream>) {
        while let Some(item) = stream.next().await {
            match item {
                Ok(snapshot) => {
                    self.apply_snapshot(&key, snapshot);
                }
                Err(e) => self.record_feed_error(&key, e),
            }
        }

        let mut s = self.state.borrow_mut();
        if s.feed.as_ref().is_some_and(|f| f.key == key) {
            log::debug!("Message feed for chat {} ended", key.chat_id);
            s.feed = None;
            s.awaiting_snapshot = false;
        }
    }

    /// Replace the visible messages with `snapshot` if `key` is the live feed.
    pub(crate) fn apply_snapshot(&self, key: &FeedKey, mut snapshot: Vec<Message>) -> bool {
        let mut s = self.state.borrow_mut();
        if !s.feed.as_ref().is_some_and(|f| &f.key == key) {
            log::debug!(
                "Dropping stale snapshot for chat {} (feed #{})",
                key.chat_id,
                key.generation
            );
            return false;
        }

        snapshot.retain(|m| m.chat_id == key.chat_id);
        let count = snapshot.len();
        s.messages = snapshot;
        s.awaiting_snapshot = false;
        drop(s);

        self.bus.emit(StoreEvent::MessagesReplaced {
            chat_id: key.chat_id.clone(),
            count,
        });
        true
    }

    fn record_feed_error(&self, key: &FeedKey, error: ChatError) {
        let mut s = self.state.borrow_mut();
        if !s.feed.as_ref().is_some_and(|f| &f.key == key) {
            return;
        }
        log::warn!("Message feed error for chat {}: {}", key.chat_id, error);
        s.awaiting_snapshot = false;
        s.last_error = Some(error.clone());
        drop(s);

        self.bus.emit(StoreEvent::MessageFeedFailed {
            chat_id: key.chat_id.clone(),
            error: error.to_string(),
        });
    }

    pub(crate) fn active_feed_key(&self) -> Option<FeedKey> {
        self.state.borrow().feed.as_ref().map(|f| f.key.clone())
    }
}

/// Put `chat` at the head of `chats`, replacing any entry with the same id.
pub fn prepend_chat(chats: &mut Vec<Chat>, chat: Chat) {
    chats.retain(|c| c.id != chat.id);
    chats.insert(0, chat);
}

/// Merge a list response into the cache.
///
/// The server order is kept as-is. Chats created locally that the response
/// does not contain yet stay at the head; ids the response does contain are
/// no longer tracked as local.
pub fn merge_chat_list(cached: &[Chat], local_created: &mut Vec<String>, server: Vec<Chat>) -> Vec<Chat> {
    local_created.retain(|id| !server.iter().any(|c| &c.id == id));

    let mut merged: Vec<Chat> = local_created
        .iter()
        .filter_map(|id| cached.iter().find(|c| &c.id == id).cloned())
        .collect();
    for chat in server {
        if !merged.iter().any(|c| c.id == chat.id) {
            merged.push(chat);
        }
    }
    merged
}

//! WASM-target tests for chat-core.
//!
//! Runs EventBus and ChatStore checks under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use std::rc::Rc;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use futures::stream;

use chat_core::event_bus::EventBus;
use chat_core::ports::*;
use chat_core::store::{merge_chat_list, ChatStore};
use chat_types::{
    ChatError, Result,
    chat::Chat,
    envelope::SendMessageOutput,
    event::StoreEvent,
};

fn chat(id: &str) -> Chat {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Chat {}", id),
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "user_id": "u1"
    }))
    .unwrap()
}

/// Backend that answers immediately and never pushes snapshots.
struct StaticBackend;

#[async_trait(?Send)]
impl ChatBackend for StaticBackend {
    async fn list_chats(&self, _owner_id: &str) -> Result<Vec<Chat>> {
        Ok(vec![chat("a"), chat("b")])
    }

    async fn create_chat(&self, _title: &str, _owner_id: &str) -> Result<Chat> {
        Err(ChatError::Network("offline".to_string()))
    }

    async fn send_message(&self, _chat_id: &str, _content: &str) -> Result<SendMessageOutput> {
        Ok(SendMessageOutput { success: true, data: None })
    }

    fn subscribe_messages(&self, _chat_id: &str) -> MessageStream {
        Box::pin(stream::pending())
    }
}

/// Drops every task; nothing here needs the background feed.
struct NullSpawner;

impl TaskSpawner for NullSpawner {
    fn spawn(&self, _task: LocalBoxFuture<'static, ()>) {}
}

fn store() -> (ChatStore, EventBus) {
    let bus = EventBus::new();
    let store = ChatStore::new(Rc::new(StaticBackend), Rc::new(NullSpawner), bus.clone());
    (store, bus)
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(StoreEvent::ChatsLoading);
    bus.emit(StoreEvent::ChatSelected { chat_id: None });
    assert_eq!(bus.drain().len(), 2);
    assert!(!bus.has_pending());
}

// ─── ChatStore Tests ─────────────────────────────────────

#[wasm_bindgen_test]
async fn load_chats_requires_owner() {
    let (store, bus) = store();
    assert!(store.load_chats().await.unwrap().is_empty());
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
async fn load_chats_for_owner() {
    let (store, _) = store();
    store.set_owner(Some("u1".to_string()));
    let chats = store.load_chats().await.unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(store.chats()[0].id, "a");
}

#[wasm_bindgen_test]
async fn failed_create_keeps_list() {
    let (store, bus) = store();
    store.set_owner(Some("u1".to_string()));
    store.load_chats().await.unwrap();
    bus.drain();

    assert!(store.create_chat("New").await.is_err());
    assert_eq!(store.chats().len(), 2);
    assert!(store.current_chat().is_none());
    assert!(matches!(
        bus.drain().as_slice(),
        [StoreEvent::ChatCreateFailed { .. }]
    ));
}

#[wasm_bindgen_test]
fn select_clears_messages_and_waits() {
    let (store, _) = store();
    store.select_chat(chat("a"));
    assert!(store.messages().is_empty());
    assert!(store.is_awaiting_messages());
    assert_eq!(store.live_chat_id(), Some("a".to_string()));
}

#[wasm_bindgen_test]
fn merge_is_deduplicated() {
    let mut local = vec!["b".to_string()];
    let merged = merge_chat_list(&[chat("b")], &mut local, vec![chat("a"), chat("b")]);
    assert_eq!(merged.len(), 2);
    assert!(local.is_empty());
}

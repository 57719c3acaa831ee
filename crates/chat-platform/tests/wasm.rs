//! chat-platform under wasm32 (`wasm-pack test --node`).
//!
//! Node has no `window`, so storage detection lands on the memory backend
//! and live sockets are out of reach; frames are checked without a socket.

use wasm_bindgen_test::*;

use chat_core::auth::SESSION_STORAGE_KEY;
use chat_core::ports::StoragePort;
use chat_platform::protocol::{interpret, FrameAction, ServerFrame};
use chat_platform::storage::{auto_detect_storage, MemoryStorage};
use chat_types::session::{AuthSession, User};

fn session(token: &str) -> AuthSession {
    AuthSession {
        access_token: token.to_string(),
        access_token_expires_in: 900,
        refresh_token: "refresh".to_string(),
        user: User {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
        },
    }
}

// ─── Storage ─────────────────────────────────────────────

#[wasm_bindgen_test]
fn detection_without_window_falls_back_to_memory() {
    assert_eq!(auto_detect_storage().backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn stored_session_survives_a_round_trip() {
    let storage = MemoryStorage::new();
    let bytes = serde_json::to_vec(&session("t1")).unwrap();
    storage.set(SESSION_STORAGE_KEY, &bytes).await.unwrap();

    let stored = storage.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
    let restored: AuthSession = serde_json::from_slice(&stored).unwrap();
    assert_eq!(restored, session("t1"));
}

#[wasm_bindgen_test]
async fn refreshed_session_replaces_the_old_one() {
    let storage = MemoryStorage::new();
    storage
        .set(SESSION_STORAGE_KEY, &serde_json::to_vec(&session("old")).unwrap())
        .await
        .unwrap();
    storage
        .set(SESSION_STORAGE_KEY, &serde_json::to_vec(&session("new")).unwrap())
        .await
        .unwrap();

    let stored = storage.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
    let restored: AuthSession = serde_json::from_slice(&stored).unwrap();
    assert_eq!(restored.access_token, "new");
}

#[wasm_bindgen_test]
async fn sign_out_clears_the_session_key() {
    let storage = MemoryStorage::new();
    storage.set(SESSION_STORAGE_KEY, b"{}").await.unwrap();
    storage.delete(SESSION_STORAGE_KEY).await.unwrap();
    assert!(storage.get(SESSION_STORAGE_KEY).await.unwrap().is_none());
    // deleting twice is fine
    storage.delete(SESSION_STORAGE_KEY).await.unwrap();
}

// ─── Subscription frames ─────────────────────────────────

#[wasm_bindgen_test]
fn empty_snapshot_is_still_a_snapshot() {
    let frame = ServerFrame::parse(r#"{"type":"next","id":"1","payload":{"data":{"messages":[]}}}"#)
        .unwrap();
    assert_eq!(interpret(frame), FrameAction::Snapshot(Vec::new()));
}

#[wasm_bindgen_test]
fn complete_frame_finishes_the_feed() {
    let frame = ServerFrame::parse(r#"{"type":"complete","id":"1"}"#).unwrap();
    assert_eq!(interpret(frame), FrameAction::Finished);
}

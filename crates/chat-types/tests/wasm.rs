//! WASM-target tests for chat-types.
//!
//! Runs the wire-format checks under wasm32-unknown-unknown
//! via `wasm-pack test --node`, where chrono parses through js-sys.

use wasm_bindgen_test::*;

use chat_types::chat::*;
use chat_types::envelope::*;
use chat_types::config::*;
use serde_json::json;

#[wasm_bindgen_test]
fn message_snapshot_parses() {
    let messages: Vec<Message> = serde_json::from_value(json!([
        {
            "id": "m1",
            "content": "hi",
            "role": "user",
            "created_at": "2024-05-01T10:00:00+00:00",
            "user_id": "u1",
            "chat_id": "c1"
        },
        {
            "id": "m2",
            "content": "hello!",
            "role": "assistant",
            "created_at": "2024-05-01T10:00:02.5+00:00",
            "user_id": "u1",
            "chat_id": "c1"
        }
    ]))
    .unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[1].is_assistant());
    assert!(messages[0].created_at < messages[1].created_at);
}

#[wasm_bindgen_test]
fn send_message_output_parses() {
    let out: SendMessageOutput =
        serde_json::from_value(json!({ "success": true, "data": { "reply": "ok" } })).unwrap();
    assert!(out.success);
    assert_eq!(out.data.unwrap()["reply"], "ok");
}

#[wasm_bindgen_test]
fn client_config_from_build_env_has_ws_url() {
    let config = ClientConfig::from_build_env();
    assert!(config.graphql_ws_url.starts_with("ws"));
}

use futures::executor::block_on;
use serde_json::{json, Value};

use chat_core::ports::StoragePort;
use chat_types::{ChatError, chat::Role};
use crate::auth::{auth_error, session_from_body};
use crate::graphql::decode_response;
use crate::operations::*;
use crate::protocol::*;
use crate::storage::MemoryStorage;

fn message_row(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "content": format!("content {}", id),
        "role": role,
        "created_at": "2024-05-01T10:00:00.123456+00:00",
        "user_id": "u1",
        "chat_id": "c1"
    })
}

// ─── GraphQL Response Tests ──────────────────────────────

#[test]
fn test_decode_chats_response() {
    let data: ChatsData = decode_response(json!({
        "data": {
            "chats": [{
                "id": "c1",
                "title": "Hello",
                "created_at": "2024-05-01T10:00:00+00:00",
                "updated_at": "2024-05-01T11:00:00+00:00",
                "user_id": "u1"
            }]
        }
    }))
    .unwrap();
    assert_eq!(data.chats.len(), 1);
    assert_eq!(data.chats[0].owner, "u1");
}

#[test]
fn test_decode_errors_fail_the_operation() {
    let err = decode_response::<ChatsData>(json!({
        "data": null,
        "errors": [
            { "message": "field 'chats' not found" },
            { "message": "permission denied" }
        ]
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ChatError::Graphql("field 'chats' not found; permission denied".to_string())
    );
}

#[test]
fn test_decode_missing_data() {
    let err = decode_response::<ChatsData>(json!({})).unwrap_err();
    assert!(matches!(err, ChatError::Graphql(_)));
}

#[test]
fn test_decode_send_message_output() {
    let data: SendMessageData = decode_response(json!({
        "data": { "sendMessage": { "success": true, "data": { "reply": "hello" } } }
    }))
    .unwrap();
    assert!(data.send_message.success);
    assert_eq!(data.send_message.data.unwrap()["reply"], "hello");
}

#[test]
fn test_operation_variables() {
    assert_eq!(get_chats_vars("u1"), json!({ "user_id": "u1" }));
    assert_eq!(create_chat_vars("T", "u1"), json!({ "title": "T", "user_id": "u1" }));
    assert_eq!(send_message_vars("c1", "hi"), json!({ "chat_id": "c1", "message": "hi" }));
    assert!(GET_MESSAGES.contains("order_by: { created_at: asc }"));
    assert!(GET_CHATS.contains("order_by: { updated_at: desc }"));
}

// ─── Subscription Protocol Tests ─────────────────────────

#[test]
fn test_connection_init_carries_bearer() {
    let text = ClientFrame::connection_init(Some("tok")).to_text().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "connection_init");
    assert_eq!(value["payload"]["headers"]["Authorization"], "Bearer tok");
}

#[test]
fn test_connection_init_without_token() {
    let value: Value =
        serde_json::from_str(&ClientFrame::connection_init(None).to_text().unwrap()).unwrap();
    assert_eq!(value, json!({ "type": "connection_init" }));
}

#[test]
fn test_subscribe_frame() {
    let frame = ClientFrame::subscribe(GET_MESSAGES, get_messages_vars("c1"));
    let value: Value = serde_json::from_str(&frame.to_text().unwrap()).unwrap();
    assert_eq!(value["type"], "subscribe");
    assert_eq!(value["id"], SUBSCRIPTION_ID);
    assert_eq!(value["payload"]["variables"]["chat_id"], "c1");
}

#[test]
fn test_pong_frame() {
    assert_eq!(ClientFrame::Pong {}.to_text().unwrap(), r#"{"type":"pong"}"#);
}

#[test]
fn test_parse_server_frames() {
    assert_eq!(
        ServerFrame::parse(r#"{"type":"connection_ack","payload":{}}"#).unwrap(),
        ServerFrame::ConnectionAck {}
    );
    assert_eq!(ServerFrame::parse(r#"{"type":"ping"}"#).unwrap(), ServerFrame::Ping {});
    assert!(ServerFrame::parse(r#"{"type":"bogus"}"#).is_err());
    assert!(ServerFrame::parse("not json").is_err());
}

#[test]
fn test_next_frame_is_a_full_snapshot() {
    let frame = ServerFrame::Next {
        id: SUBSCRIPTION_ID.to_string(),
        payload: json!({
            "data": { "messages": [message_row("m1", "user"), message_row("m2", "assistant")] }
        }),
    };
    match interpret(frame) {
        FrameAction::Snapshot(messages) => {
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role, Role::User);
            assert_eq!(messages[1].role, Role::Assistant);
        }
        other => panic!("expected snapshot, got {:?}", other),
    }
}

#[test]
fn test_next_frame_with_errors_fails() {
    let frame = ServerFrame::Next {
        id: SUBSCRIPTION_ID.to_string(),
        payload: json!({ "errors": [{ "message": "boom" }] }),
    };
    assert_eq!(
        interpret(frame),
        FrameAction::Failed(ChatError::Graphql("boom".to_string()))
    );
}

#[test]
fn test_error_frame_rejects_subscription() {
    let frame = ServerFrame::parse(
        r#"{"type":"error","id":"1","payload":[{"message":"not authorized"}]}"#,
    )
    .unwrap();
    assert_eq!(
        interpret(frame),
        FrameAction::Rejected(ChatError::Graphql("not authorized".to_string()))
    );
}

#[test]
fn test_complete_and_foreign_ids() {
    assert_eq!(
        interpret(ServerFrame::Complete { id: SUBSCRIPTION_ID.to_string() }),
        FrameAction::Finished
    );
    assert_eq!(
        interpret(ServerFrame::Complete { id: "other".to_string() }),
        FrameAction::Ignore
    );
    assert_eq!(interpret(ServerFrame::Ping {}), FrameAction::Pong);
    assert_eq!(interpret(ServerFrame::Pong {}), FrameAction::Ignore);
}

// ─── Auth Response Tests ─────────────────────────────────

#[test]
fn test_session_from_sign_in_body() {
    let session = session_from_body(json!({
        "session": {
            "accessToken": "at",
            "accessTokenExpiresIn": 900,
            "refreshToken": "rt",
            "user": { "id": "u1", "email": "a@b.c", "displayName": "A" }
        },
        "mfa": null
    }))
    .unwrap()
    .unwrap();
    assert_eq!(session.access_token, "at");
    assert_eq!(session.user.email, "a@b.c");
}

#[test]
fn test_sign_up_pending_verification_has_no_session() {
    assert!(session_from_body(json!({ "session": null })).unwrap().is_none());
}

#[test]
fn test_auth_error_prefers_service_message() {
    assert_eq!(
        auth_error(401, r#"{"status":401,"message":"Incorrect email or password","error":"invalid-email-password"}"#),
        ChatError::Auth("Incorrect email or password".to_string())
    );
    assert_eq!(
        auth_error(500, "<html>"),
        ChatError::Auth("Auth request failed with HTTP 500".to_string())
    );
}

// ─── Storage Tests ───────────────────────────────────────

#[test]
fn test_memory_storage_roundtrip() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
    block_on(storage.set("k", b"v")).unwrap();
    assert_eq!(block_on(storage.get("k")).unwrap(), Some(b"v".to_vec()));
    block_on(storage.delete("k")).unwrap();
    assert!(block_on(storage.get("k")).unwrap().is_none());
}

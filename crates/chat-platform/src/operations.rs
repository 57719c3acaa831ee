//! GraphQL documents and the `data` shapes they return.

use serde::Deserialize;
use serde_json::{json, Value};

use chat_types::{
    chat::{Chat, Message},
    envelope::SendMessageOutput,
};

pub const GET_CHATS: &str = r#"
query GetChats($user_id: uuid!) {
  chats(where: { user_id: { _eq: $user_id } }, order_by: { updated_at: desc }) {
    id
    title
    created_at
    updated_at
    user_id
  }
}"#;

pub const GET_MESSAGES: &str = r#"
subscription GetMessages($chat_id: uuid!) {
  messages(where: { chat_id: { _eq: $chat_id } }, order_by: { created_at: asc }) {
    id
    content
    role
    created_at
    user_id
    chat_id
  }
}"#;

pub const CREATE_CHAT: &str = r#"
mutation CreateChat($title: String!, $user_id: uuid!) {
  insert_chats_one(object: { title: $title, user_id: $user_id }) {
    id
    title
    created_at
    updated_at
    user_id
  }
}"#;

pub const SEND_MESSAGE: &str = r#"
mutation SendMessage($chat_id: uuid!, $message: String!) {
  sendMessage(chat_id: $chat_id, message: $message) {
    success
    data
  }
}"#;

pub fn get_chats_vars(owner_id: &str) -> Value {
    json!({ "user_id": owner_id })
}

pub fn get_messages_vars(chat_id: &str) -> Value {
    json!({ "chat_id": chat_id })
}

pub fn create_chat_vars(title: &str, owner_id: &str) -> Value {
    json!({ "title": title, "user_id": owner_id })
}

pub fn send_message_vars(chat_id: &str, message: &str) -> Value {
    json!({ "chat_id": chat_id, "message": message })
}

#[derive(Debug, Deserialize)]
pub struct ChatsData {
    pub chats: Vec<Chat>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesData {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChatData {
    pub insert_chats_one: Chat,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageData {
    #[serde(rename = "sendMessage")]
    pub send_message: SendMessageOutput,
}

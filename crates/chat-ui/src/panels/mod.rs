pub mod auth;
pub mod chat_list;
pub mod message_view;
pub mod new_chat;

//! Webhook relay for the `sendMessage` action.
//!
//! The GraphQL engine posts an action envelope here; the relay validates it,
//! forwards `{chat_id, message, user_id, timestamp}` to the configured
//! automation webhook and wraps the webhook's JSON answer in a response
//! envelope. Every failure is mapped to a [`RelayError`] with a stable status
//! code, so nothing escapes the handler unconverted.

pub mod config;
pub mod error;
pub mod retry;
pub mod webhook;
pub mod handler;
pub mod server;

pub use error::RelayError;

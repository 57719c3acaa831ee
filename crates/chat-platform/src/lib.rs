//! Browser adapters for the chat-core ports.
//!
//! - [`backend::HasuraBackend`]: queries and mutations over GraphQL HTTP,
//!   live message lists over a `graphql-transport-ws` socket
//! - [`auth::NhostAuth`]: email/password auth against the auth service
//! - [`storage`]: `localStorage` with an in-memory fallback
//! - [`spawn::WasmSpawner`], [`spawn::WasmTimer`]: background tasks and
//!   delays on the browser event loop

pub mod graphql;
pub mod operations;
pub mod protocol;
pub mod subscription;
pub mod backend;
pub mod auth;
pub mod storage;
pub mod spawn;

#[cfg(test)]
mod tests;

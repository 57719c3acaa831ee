//! egui views over the chat store.
//!
//! Panels never call the store directly: they render from borrowed state
//! and return a [`state::UiAction`] for the app to dispatch.

pub mod state;
pub mod theme;
pub mod panels;

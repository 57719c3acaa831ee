//! Client-side chat state and the seams it talks through.
//!
//! `ChatStore` and `AuthGate` are constructed once by the composition root
//! and shared by reference with the view layer. Everything here is
//! single-threaded (`Rc`/`RefCell`) because it runs on the browser's event
//! loop.

pub mod ports;
pub mod event_bus;
pub mod store;
pub mod auth;

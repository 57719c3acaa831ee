//! Queue of [`StoreEvent`]s between the stores and the egui frame loop.
//!
//! Async work (list loads, sends, live feeds) finishes between frames; it
//! pushes events here and the UI takes them all at the start of the next
//! frame. Single-threaded, like everything else in the client.

use std::cell::RefCell;
use std::rc::Rc;
use chat_types::event::StoreEvent;

/// Handle to one shared queue; clones publish to the same queue.
#[derive(Clone, Default)]
pub struct EventBus {
    pending: Rc<RefCell<Vec<StoreEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: StoreEvent) {
        self.pending.borrow_mut().push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }
}

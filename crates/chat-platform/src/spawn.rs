use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use chat_core::ports::{TaskSpawner, Timer};

/// Runs tasks with `wasm_bindgen_futures::spawn_local`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmSpawner;

impl TaskSpawner for WasmSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `setTimeout`-backed delays.
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmTimer;

impl Timer for WasmTimer {
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        // setTimeout takes a 32-bit millisecond count
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }
}

//! Chat App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters, the store and the auth gate, and
//! hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "chat_canvas";

/// WASM entry point: called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Chat client starting...");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No window document; cannot start");
        return;
    };
    let canvas = match document
        .get_element_by_id(CANVAS_ID)
        .map(|el| el.dyn_into::<web_sys::HtmlCanvasElement>())
    {
        Some(Ok(canvas)) => canvas,
        Some(Err(_)) => {
            log::error!("Element '{}' is not a canvas", CANVAS_ID);
            return;
        }
        None => {
            log::error!("No canvas element with id '{}'", CANVAS_ID);
            return;
        }
    };

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::ChatApp::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

//! WASM entry points for the nano browser extension.
//!
//! The same module is loaded in two places:
//!
//! - the background service worker, which calls `startBackground()`
//! - every frame's content script, which calls `startContent()`

mod background;
mod content;
mod listen;

pub use background::start_background;
pub use content::{edit_focused, start_content};

use wasm_bindgen::prelude::*;

/// Install the panic hook and the console tracing layer.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A second init (module re-instantiated in the same realm) keeps the first.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}

//! Content script: waits for a trigger and runs one edit session in-page.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use nano_browser::chrome;
use nano_browser::{EditSession, Outcome, PageCommand, RuntimeTransport, locate};

use crate::listen::on_path;

/// Listen for triggers from the background worker.
#[wasm_bindgen(js_name = startContent)]
pub fn start_content() -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        |message: JsValue, _sender: JsValue, _send_response: Function| {
            if let Ok(command) = chrome::from_js::<PageCommand>(message) {
                spawn_local(run_command(command));
            }
            // Nothing to answer; the edit result never goes back to the sender.
            false
        },
    );
    on_path(&["chrome", "runtime", "onMessage"], closure)
}

async fn run_command(command: PageCommand) {
    let document = gloo_utils::document();
    let has_focus = document.has_focus().unwrap_or(false);
    let active_tag = document.active_element().map(|el| el.tag_name());
    if !command.runs_here(has_focus, active_tag.as_deref()) {
        return;
    }
    edit_in(&document).await;
}

/// Edit whatever is focused or selected in this frame.
#[wasm_bindgen(js_name = editFocused)]
pub async fn edit_focused() {
    edit_in(&gloo_utils::document()).await;
}

async fn edit_in(document: &Document) {
    let located = match locate(document) {
        Ok(located) => located,
        Err(e) => {
            tracing::warn!("locating edit target failed: {e}");
            return;
        }
    };

    let outcome = EditSession::new(RuntimeTransport).run(located).await;
    match &outcome {
        Outcome::Applied => tracing::info!("editor output applied"),
        Outcome::Dropped(e) => tracing::info!("editor output dropped: {e}"),
        other => tracing::debug!(?other, "edit session finished"),
    }
}

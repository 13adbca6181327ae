//! Synthetic DOM events so page scripts see programmatic edits.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    ClipboardEvent, ClipboardEventInit, DataTransfer, EventTarget, InputEvent, InputEventInit,
};

/// Fire a bubbling `input` event, as if the user replaced the text.
///
/// Returns `false` if a listener cancelled it.
pub fn dispatch_input(target: &EventTarget, data: &str) -> Result<bool, JsValue> {
    let init = InputEventInit::new();
    init.set_bubbles(true);
    init.set_input_type("insertReplacementText");
    init.set_data(Some(data));
    let event = InputEvent::new_with_event_init_dict("input", &init)?;
    target.dispatch_event(&event)
}

/// Fire a bubbling, cancelable `paste` carrying `text` as `text/plain`.
///
/// Returns `false` when a page handler called `preventDefault`, which is how
/// rich editors signal they consumed the paste.
pub fn dispatch_paste(target: &EventTarget, text: &str) -> Result<bool, JsValue> {
    let data = DataTransfer::new()?;
    data.set_data("text/plain", text)?;

    let init = ClipboardEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_clipboard_data(Some(&data));
    let event = ClipboardEvent::new_with_event_init_dict("paste", &init)?;
    target.dispatch_event(&event)
}

/// Yield to the event loop once (a zero-delay timeout).
///
/// Page input handlers observe a fresh selection only after control has
/// returned to the loop; whether one turn is always enough depends on the
/// page.
pub async fn next_tick() -> Result<(), JsValue> {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .map(|w| w.set_timeout_with_callback(&resolve).is_ok())
            .unwrap_or(false);
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}

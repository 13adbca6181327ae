//! System clipboard fallback for contenteditable write-back.
//!
//! Pages are free to ignore a synthetic paste, so the edited text also goes
//! onto the clipboard where the user can paste it by hand.

use wasm_bindgen::JsValue;

/// Write plain text via the async Clipboard API.
///
/// Needs a focused document; rejects otherwise.
pub async fn write_text(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = window.navigator().clipboard();
    wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text)).await?;
    tracing::debug!("Wrote {} bytes to clipboard", text.len());
    Ok(())
}

/// Like [`write_text`] but only logs failures.
pub async fn write_text_best_effort(text: &str) {
    if let Err(e) = write_text(text).await {
        tracing::debug!("Clipboard write failed: {}", crate::chrome::describe(&e));
    }
}

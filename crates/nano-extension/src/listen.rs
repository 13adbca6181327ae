//! Small helpers for hooking Rust closures onto `chrome.*` events.

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;

use nano_browser::chrome::{self, ChromeEvent};

/// Attach `closure` to `event`. The closure lives as long as JS holds it.
pub fn on<F: ?Sized + WasmClosure>(event: &ChromeEvent, closure: Closure<F>) {
    let callback: Function = closure.into_js_value().unchecked_into();
    event.add_listener(&callback);
}

/// Attach `closure` to the event at `path`, e.g. `["chrome", "action", "onClicked"]`.
pub fn on_path<F: ?Sized + WasmClosure>(path: &[&str], closure: Closure<F>) -> Result<(), JsValue> {
    let event = chrome::event(path)?;
    on(&event, closure);
    Ok(())
}

pub fn get(obj: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

pub fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    get(obj, key)?.as_string()
}

pub fn get_i32(obj: &JsValue, key: &str) -> Option<i32> {
    get(obj, key)?.as_f64().map(|n| n as i32)
}

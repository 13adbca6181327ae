//! Bindings for the `chrome.*` extension APIs nano uses.
//!
//! Promise-returning calls are bound raw and wrapped in `JsFuture`; event
//! objects (`chrome.runtime.onMessage` and friends) are looked up by path
//! from the global object, so the same code runs in the service worker and
//! in content scripts, where only part of the API exists.

use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// A `chrome.events.Event`.
    pub type ChromeEvent;

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &ChromeEvent, callback: &Function);

    /// A `runtime.Port`.
    #[derive(Clone, Debug)]
    pub type Port;

    #[wasm_bindgen(method, getter)]
    pub fn name(this: &Port) -> String;

    #[wasm_bindgen(method, getter, js_name = onMessage)]
    pub fn on_message(this: &Port) -> ChromeEvent;

    #[wasm_bindgen(method, getter, js_name = onDisconnect)]
    pub fn on_disconnect(this: &Port) -> ChromeEvent;

    #[wasm_bindgen(method, js_name = postMessage, catch)]
    pub fn post_message(this: &Port, message: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendNativeMessage, catch)]
    fn send_native_message_raw(application: &str, message: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn send_message_raw(message: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    pub fn get_url(path: &str) -> String;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = get, catch)]
    fn storage_sync_get_raw(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = set, catch)]
    fn storage_sync_set_raw(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "contextMenus"], js_name = removeAll, catch)]
    fn context_menus_remove_all_raw() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "contextMenus"], js_name = create, catch)]
    fn context_menus_create_raw(properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = sendMessage, catch)]
    fn tabs_send_message_raw(
        tab_id: i32,
        message: &JsValue,
        options: &JsValue,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_name = fetch, catch)]
    fn fetch_raw(url: &str) -> Result<Promise, JsValue>;
}

/// Look up an event object such as `["chrome", "runtime", "onMessage"]`.
pub fn event(path: &[&str]) -> Result<ChromeEvent, JsValue> {
    let mut current: JsValue = js_sys::global().into();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key))?;
        if current.is_undefined() || current.is_null() {
            return Err(JsValue::from_str(&format!(
                "extension API not available: {}",
                path.join(".")
            )));
        }
    }
    Ok(current.unchecked_into())
}

pub async fn send_native_message(application: &str, message: &JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(send_native_message_raw(application, message)?).await
}

pub async fn send_message(message: &JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(send_message_raw(message)?).await
}

/// Everything in `storage.sync`.
pub async fn storage_sync_get_all() -> Result<JsValue, JsValue> {
    JsFuture::from(storage_sync_get_raw(&JsValue::NULL)?).await
}

pub async fn storage_sync_set(items: &JsValue) -> Result<(), JsValue> {
    JsFuture::from(storage_sync_set_raw(items)?).await.map(|_| ())
}

pub async fn context_menus_remove_all() -> Result<(), JsValue> {
    JsFuture::from(context_menus_remove_all_raw()?).await.map(|_| ())
}

pub fn context_menus_create(properties: &JsValue) -> Result<(), JsValue> {
    context_menus_create_raw(properties).map(|_| ())
}

/// Message one frame of a tab, or every frame when `frame_id` is `None`.
pub async fn tabs_send_message(
    tab_id: i32,
    message: &JsValue,
    frame_id: Option<i32>,
) -> Result<JsValue, JsValue> {
    let options = js_sys::Object::new();
    if let Some(frame_id) = frame_id {
        Reflect::set(&options, &"frameId".into(), &frame_id.into())?;
    }
    JsFuture::from(tabs_send_message_raw(tab_id, message, &options)?).await
}

/// `fetch(url).then(r => r.json())`
pub async fn fetch_json(url: &str) -> Result<JsValue, JsValue> {
    let response: web_sys::Response = JsFuture::from(fetch_raw(url)?).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "fetching {url} failed with {}",
            response.status()
        )));
    }
    JsFuture::from(response.json()?).await
}

/// Serialize to a plain JS object (maps become objects, `None` becomes `null`).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(Into::into)
}

/// Best-effort human readable form of a thrown JS value.
pub fn describe(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

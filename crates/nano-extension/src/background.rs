//! Background service worker: owns the editor config, answers content
//! scripts and the options page, and turns gestures into page triggers.

use std::rc::Rc;

use js_sys::Function;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use nano_browser::chrome::{self, Port};
use nano_browser::{
    CONTEXT_MENU_ID, ChromeNativeHost, ContextMenuItem, Coordinator, InstallReason, PageCommand,
    Reply, SETTINGS_KEY, SyncStorage, fetch_defaults,
};

use crate::listen::{get, get_i32, get_string, on, on_path};

type BackgroundCoordinator = Coordinator<ChromeNativeHost, SyncStorage>;

/// Keyboard command declared in the manifest.
const EDIT_COMMAND: &str = "edit-text";

/// Wire every background listener. Call once per worker start.
#[wasm_bindgen(js_name = startBackground)]
pub fn start_background() -> Result<(), JsValue> {
    let coordinator = Rc::new(Coordinator::new(ChromeNativeHost, SyncStorage));

    // A restarted worker has lost its in-memory config.
    {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            if let Err(e) = coordinator.reload().await {
                tracing::debug!("no stored config yet: {e}");
            }
        });
    }

    listen_installed(coordinator.clone())?;
    listen_settings_changes(coordinator.clone())?;
    listen_messages(coordinator.clone())?;
    listen_connections(coordinator)?;
    listen_gestures()?;

    tracing::info!("background started");
    Ok(())
}

fn listen_installed(coordinator: Rc<BackgroundCoordinator>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |details: JsValue| {
        let reason = InstallReason::parse(&get_string(&details, "reason").unwrap_or_default());
        let coordinator = coordinator.clone();
        spawn_local(async move {
            register_context_menu().await;
            handle_installed(&coordinator, reason).await;
        });
    });
    on_path(&["chrome", "runtime", "onInstalled"], closure)
}

async fn handle_installed(coordinator: &BackgroundCoordinator, reason: InstallReason) {
    let defaults = match reason {
        InstallReason::Install | InstallReason::Update => match fetch_defaults().await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("loading bundled defaults failed: {e}");
                return;
            }
        },
        InstallReason::Other(_) => Value::Object(Default::default()),
    };
    if let Err(e) = coordinator.on_installed(&reason, defaults).await {
        tracing::warn!(?reason, "install handling failed: {e}");
    }
}

async fn register_context_menu() {
    if let Err(e) = chrome::context_menus_remove_all().await {
        tracing::debug!("removing menus failed: {}", chrome::describe(&e));
    }
    let created = chrome::to_js(&ContextMenuItem::open_nano())
        .and_then(|item| chrome::context_menus_create(&item));
    if let Err(e) = created {
        tracing::warn!("creating context menu failed: {}", chrome::describe(&e));
    }
}

fn listen_settings_changes(coordinator: Rc<BackgroundCoordinator>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |changes: JsValue, area: JsValue| {
        if area.as_string().as_deref() != Some("sync") {
            return;
        }
        let Some(new_value) = get(&changes, SETTINGS_KEY).and_then(|c| get(&c, "newValue")) else {
            return;
        };
        let applied = chrome::from_js::<Value>(new_value)
            .map_err(|e| chrome::describe(&e))
            .and_then(|value| coordinator.apply_settings(value).map_err(|e| e.to_string()));
        if let Err(e) = applied {
            tracing::warn!("ignoring settings change: {e}");
        }
    });
    on_path(&["chrome", "storage", "onChanged"], closure)
}

fn listen_messages(coordinator: Rc<BackgroundCoordinator>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        move |message: JsValue, _sender: JsValue, send_response: Function| {
            let message = chrome::from_js::<Value>(message).unwrap_or(Value::Null);
            let coordinator = coordinator.clone();
            spawn_local(async move {
                let reply = coordinator.handle_message(&message).await;
                respond(&send_response, &reply);
            });
            // Keep the channel open; the reply is sent asynchronously.
            true
        },
    );
    on_path(&["chrome", "runtime", "onMessage"], closure)
}

fn respond(send_response: &Function, reply: &Reply) {
    let sent = chrome::to_js(reply).and_then(|js| send_response.call1(&JsValue::NULL, &js));
    if let Err(e) = sent {
        tracing::warn!("sending reply failed: {}", chrome::describe(&e));
    }
}

fn post(port: &Port, reply: &Reply) {
    let sent = chrome::to_js(reply).and_then(|js| port.post_message(&js));
    if let Err(e) = sent {
        tracing::debug!(port = %port.name(), "posting to port failed: {}", chrome::describe(&e));
    }
}

fn listen_connections(coordinator: Rc<BackgroundCoordinator>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Port)>::new(move |port: Port| {
        let channel = match coordinator.connect(&port.name()) {
            Ok(channel) => channel,
            Err(payload) => {
                // One error message, then the port is left alone.
                post(&port, &payload.into());
                return;
            }
        };

        let coordinator = coordinator.clone();
        let reply_port = port.clone();
        let on_message = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
            let message = chrome::from_js::<Value>(message).unwrap_or(Value::Null);
            let coordinator = coordinator.clone();
            let port = reply_port.clone();
            spawn_local(async move {
                let reply = coordinator.handle_port_message(channel, &message).await;
                post(&port, &reply);
            });
        });
        on(&port.on_message(), on_message);

        let name = port.name();
        let on_disconnect = Closure::<dyn FnMut()>::new(move || {
            tracing::debug!(port = %name, "port disconnected");
        });
        on(&port.on_disconnect(), on_disconnect);
    });
    on_path(&["chrome", "runtime", "onConnect"], closure)
}

fn listen_gestures() -> Result<(), JsValue> {
    let action = Closure::<dyn FnMut(JsValue)>::new(|tab: JsValue| {
        if let Some(tab_id) = get_i32(&tab, "id") {
            spawn_local(trigger(tab_id, None));
        }
    });
    on_path(&["chrome", "action", "onClicked"], action)?;

    let menu = Closure::<dyn FnMut(JsValue, JsValue)>::new(|info: JsValue, tab: JsValue| {
        if get_string(&info, "menuItemId").as_deref() != Some(CONTEXT_MENU_ID) {
            return;
        }
        if let Some(tab_id) = get_i32(&tab, "id") {
            spawn_local(trigger(tab_id, get_i32(&info, "frameId")));
        }
    });
    on_path(&["chrome", "contextMenus", "onClicked"], menu)?;

    let command = Closure::<dyn FnMut(JsValue, JsValue)>::new(|name: JsValue, tab: JsValue| {
        if name.as_string().as_deref() != Some(EDIT_COMMAND) {
            return;
        }
        if let Some(tab_id) = get_i32(&tab, "id") {
            spawn_local(trigger(tab_id, None));
        }
    });
    // Not every browser exposes `commands`; the shortcut is optional.
    if let Err(e) = on_path(&["chrome", "commands", "onCommand"], command) {
        tracing::debug!("keyboard command unavailable: {}", chrome::describe(&e));
    }
    Ok(())
}

/// Ask the content script(s) in a tab to run an edit session.
async fn trigger(tab_id: i32, frame_id: Option<i32>) {
    let command = match frame_id {
        Some(_) => PageCommand::to_frame(),
        None => PageCommand::broadcast(),
    };
    let message = match chrome::to_js(&command) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("encoding trigger failed: {}", chrome::describe(&e));
            return;
        }
    };
    if let Err(e) = chrome::tabs_send_message(tab_id, &message, frame_id).await {
        // No content script on this page (e.g. browser-internal pages).
        tracing::debug!(tab_id, ?frame_id, "trigger not delivered: {}", chrome::describe(&e));
    }
}

//! `chrome.storage.sync` as a [`SettingsStore`], plus the bundled defaults.

use serde_json::Value;

use nano_core::{DEFAULTS_RESOURCE, Settings, SettingsStore, StoreError};

use crate::chrome;

/// The browser's synced key-value store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStorage;

impl SettingsStore for SyncStorage {
    async fn load(&self) -> Result<Settings, StoreError> {
        let items = chrome::storage_sync_get_all()
            .await
            .map_err(|e| StoreError(chrome::describe(&e)))?;
        match chrome::from_js::<Value>(items).map_err(|e| StoreError(chrome::describe(&e)))? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Settings::new()),
            other => Err(format!("unexpected storage contents: {other}").into()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let items = chrome::to_js(settings).map_err(|e| StoreError(chrome::describe(&e)))?;
        chrome::storage_sync_set(&items)
            .await
            .map_err(|e| StoreError(chrome::describe(&e)))
    }
}

/// Fetch and parse the `defaults.json` shipped with the extension.
pub async fn fetch_defaults() -> Result<Value, StoreError> {
    let url = chrome::get_url(DEFAULTS_RESOURCE);
    let json = chrome::fetch_json(&url)
        .await
        .map_err(|e| StoreError(chrome::describe(&e)))?;
    chrome::from_js(json).map_err(|e| StoreError(chrome::describe(&e)))
}

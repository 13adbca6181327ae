//! Editor configuration and the synced settings blob it lives in.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, StoreError};

/// Key the editor configuration is stored under in synced storage.
pub const SETTINGS_KEY: &str = "nano";

/// Path of the bundled default settings resource.
pub const DEFAULTS_RESOURCE: &str = "defaults.json";

/// How to invoke the external editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Executable name resolved by the native host.
    pub command: String,
    /// Passed verbatim, in order, before the temp file path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl EditorConfig {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(())
    }

    /// Read the config out of a settings map.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let value = settings
            .get(SETTINGS_KEY)
            .ok_or(ConfigError::Missing(SETTINGS_KEY))?;
        Self::from_value(value.clone())
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let config: EditorConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Settings map holding just this config under [`SETTINGS_KEY`].
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new();
        // EditorConfig always serializes to an object.
        if let Ok(value) = serde_json::to_value(self) {
            settings.insert(SETTINGS_KEY.to_string(), value);
        }
        settings
    }
}

impl Default for EditorConfig {
    /// Opens GNU nano in a terminal, matching the bundled defaults.
    fn default() -> Self {
        Self::new("xterm", ["-e", "nano"])
    }
}

/// The synced key-value map. Keys other than [`SETTINGS_KEY`] are carried
/// through untouched.
pub type Settings = Map<String, Value>;

/// Union of two settings maps where `existing` wins on overlapping keys.
///
/// Used on extension update so that new default keys appear while the
/// user's own values survive.
pub fn merge_settings(defaults: Settings, existing: Settings) -> Settings {
    let mut merged = defaults;
    for (key, value) in existing {
        merged.insert(key, value);
    }
    merged
}

/// Persistent settings storage.
pub trait SettingsStore {
    /// Loads everything in the store.
    fn load(&self) -> impl Future<Output = Result<Settings, StoreError>>;

    /// Writes the given keys, leaving others alone.
    fn save(&self, settings: &Settings) -> impl Future<Output = Result<(), StoreError>>;
}

/// In-memory store, used by tests and as a stand-in before storage loads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: std::cell::RefCell<Settings>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: std::cell::RefCell::new(settings),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.inner.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        for (key, value) in settings {
            inner.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(v: Value) -> Settings {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_settings() {
        let s = settings(json!({"nano": {"command": "gvim", "args": ["-f"]}}));
        let config = EditorConfig::from_settings(&s).unwrap();
        assert_eq!(config, EditorConfig::new("gvim", ["-f"]));
    }

    #[test]
    fn test_args_default_to_empty() {
        let config = EditorConfig::from_value(json!({"command": "code"})).unwrap();
        assert!(config.args.is_empty());
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = EditorConfig::from_value(json!({"command": "  ", "args": []})).unwrap_err();
        assert_eq!(err, ConfigError::EmptyCommand);
    }

    #[test]
    fn test_missing_key() {
        let err = EditorConfig::from_settings(&Settings::new()).unwrap_err();
        assert_eq!(err, ConfigError::Missing("nano"));
    }

    #[test]
    fn test_wrong_shape_is_invalid() {
        let err = EditorConfig::from_value(json!({"command": 3})).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_merge_existing_wins() {
        let defaults = settings(json!({
            "nano": {"command": "xterm", "args": ["-e", "nano"]},
            "newKey": true,
        }));
        let existing = settings(json!({
            "nano": {"command": "gvim", "args": ["-f"]},
            "userKey": 1,
        }));
        let merged = merge_settings(defaults, existing);
        assert_eq!(
            Value::Object(merged),
            json!({
                "nano": {"command": "gvim", "args": ["-f"]},
                "newKey": true,
                "userKey": 1,
            })
        );
    }

    #[test]
    fn test_to_settings_round_trips() {
        let config = EditorConfig::new("emacsclient", ["-c"]);
        assert_eq!(EditorConfig::from_settings(&config.to_settings()).unwrap(), config);
    }

    #[tokio::test]
    async fn test_memory_store_save_merges_keys() {
        let store = MemoryStore::new(settings(json!({"other": 1})));
        store
            .save(&EditorConfig::default().to_settings())
            .await
            .unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.get("other"), Some(&json!(1)));
        assert!(loaded.contains_key("nano"));
    }
}

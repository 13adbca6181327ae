//! Install/update handling and the context menu contribution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bridge::NativeHost;
use crate::config::{Settings, SettingsStore, merge_settings};
use crate::error::{ConfigError, NanoError};
use crate::router::Coordinator;

/// Id of the single context menu entry.
pub const CONTEXT_MENU_ID: &str = "open-nano";

/// `runtime.onInstalled` reasons we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    /// Browser update, shared module update, ...
    Other(String),
}

impl InstallReason {
    pub fn parse(reason: &str) -> Self {
        match reason {
            "install" => InstallReason::Install,
            "update" => InstallReason::Update,
            other => InstallReason::Other(other.to_string()),
        }
    }
}

/// Contexts a menu item shows up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Editable,
    Selection,
}

/// Argument to `contextMenus.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl ContextMenuItem {
    pub fn open_nano() -> Self {
        Self {
            id: CONTEXT_MENU_ID.to_string(),
            title: "Edit in external editor".to_string(),
            contexts: vec![MenuContext::Editable, MenuContext::Selection],
        }
    }
}

/// Settings to write for an install event, or `None` to leave storage alone.
///
/// On install the defaults go in wholesale; on update the stored values win
/// over the defaults key by key.
pub fn settings_for_install(
    reason: &InstallReason,
    defaults: Settings,
    stored: Settings,
) -> Option<Settings> {
    match reason {
        InstallReason::Install => Some(defaults),
        InstallReason::Update => Some(merge_settings(defaults, stored)),
        InstallReason::Other(_) => None,
    }
}

impl<H: NativeHost, S: SettingsStore> Coordinator<H, S> {
    /// Seed or merge settings after install/update, then reload the config.
    ///
    /// `defaults` is the parsed bundled defaults resource.
    pub async fn on_installed(&self, reason: &InstallReason, defaults: Value) -> Result<(), NanoError> {
        let Value::Object(defaults) = defaults else {
            return Err(ConfigError::Invalid("defaults must be a JSON object".into()).into());
        };
        let stored = match reason {
            InstallReason::Update => self.store().load().await?,
            _ => Settings::new(),
        };
        if let Some(settings) = settings_for_install(reason, defaults, stored) {
            tracing::info!(?reason, keys = settings.len(), "writing settings");
            self.store().save(&settings).await?;
        }
        self.reload().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditorConfig, MemoryStore};
    use crate::error::BridgeError;
    use crate::protocol::{CommandResult, NativeRequest};
    use serde_json::json;

    struct NoHost;

    impl NativeHost for NoHost {
        async fn send(&self, _: &str, _: &NativeRequest) -> Result<CommandResult, BridgeError> {
            Err(BridgeError::Unreachable("unused".into()))
        }
    }

    fn defaults() -> Value {
        json!({"nano": {"command": "xterm", "args": ["-e", "nano"]}, "theme": "dark"})
    }

    fn as_settings(v: Value) -> Settings {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_reason_parse() {
        assert_eq!(InstallReason::parse("install"), InstallReason::Install);
        assert_eq!(InstallReason::parse("update"), InstallReason::Update);
        assert_eq!(
            InstallReason::parse("chrome_update"),
            InstallReason::Other("chrome_update".into())
        );
    }

    #[test]
    fn test_menu_item_shape() {
        assert_eq!(
            serde_json::to_value(ContextMenuItem::open_nano()).unwrap(),
            json!({
                "id": "open-nano",
                "title": "Edit in external editor",
                "contexts": ["editable", "selection"],
            })
        );
    }

    #[test]
    fn test_browser_update_leaves_storage_alone() {
        let out = settings_for_install(
            &InstallReason::Other("chrome_update".into()),
            as_settings(defaults()),
            Settings::new(),
        );
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn test_install_stores_defaults_wholesale() {
        let c = Coordinator::new(NoHost, MemoryStore::default());
        c.on_installed(&InstallReason::Install, defaults()).await.unwrap();
        assert_eq!(Value::Object(c.store().snapshot()), defaults());
        assert_eq!(c.config(), EditorConfig::new("xterm", ["-e", "nano"]));
    }

    #[tokio::test]
    async fn test_update_keeps_user_config() {
        let store = MemoryStore::new(as_settings(json!({
            "nano": {"command": "gvim", "args": ["-f"]},
        })));
        let c = Coordinator::new(NoHost, store);
        c.on_installed(&InstallReason::Update, defaults()).await.unwrap();

        let stored = c.store().snapshot();
        assert_eq!(stored.get("nano"), Some(&json!({"command": "gvim", "args": ["-f"]})));
        assert_eq!(stored.get("theme"), Some(&json!("dark")));
        assert_eq!(c.config(), EditorConfig::new("gvim", ["-f"]));
    }

    #[tokio::test]
    async fn test_non_object_defaults_rejected() {
        let c = Coordinator::new(NoHost, MemoryStore::default());
        assert!(c.on_installed(&InstallReason::Install, json!([1, 2])).await.is_err());
        assert!(c.store().snapshot().is_empty());
    }
}

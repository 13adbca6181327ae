//! Background coordinator: routes messages and connections to handlers.

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::bridge::{NativeBridge, NativeHost};
use crate::config::{EditorConfig, SETTINGS_KEY, SettingsStore};
use crate::error::{ConfigError, NanoError};
use crate::protocol::{ActionName, CommandResult, ErrorPayload, Reply, SettingsReply};

/// A one-shot message, classified by its `type` and `action` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    EditTextArea { input: String },
    UnknownAction(String),
    Unknown,
}

impl Request {
    pub fn parse(message: &Value) -> Self {
        match message.get("type").and_then(Value::as_str) {
            Some("action") => {}
            _ => return Request::Unknown,
        }
        match message.get("action").and_then(Value::as_str) {
            Some(a) if a == ActionName::EditTextArea.as_str() => Request::EditTextArea {
                input: message
                    .get("input")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            Some(other) => Request::UnknownAction(other.to_string()),
            None => Request::UnknownAction("undefined".to_string()),
        }
    }
}

/// Long-lived connection kinds, keyed by port name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Streams edit requests; each message gets a [`CommandResult`].
    Editor,
    /// Reads and writes editor settings.
    Options,
}

impl Channel {
    pub fn from_name(name: &str) -> Result<Self, ErrorPayload> {
        match name {
            "editor" => Ok(Channel::Editor),
            "options" => Ok(Channel::Options),
            other => Err(ErrorPayload::unknown_connection(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Editor => "editor",
            Channel::Options => "options",
        }
    }
}

/// Messages on the `options` channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsMessage {
    Get,
    Set(Value),
    Unknown,
}

impl OptionsMessage {
    pub fn parse(message: &Value) -> Self {
        match message.get("type").and_then(Value::as_str) {
            Some("get") => OptionsMessage::Get,
            Some("set") => {
                let mut fields = message.clone();
                if let Some(obj) = fields.as_object_mut() {
                    obj.remove("type");
                }
                OptionsMessage::Set(fields)
            }
            _ => OptionsMessage::Unknown,
        }
    }
}

/// Owns the editor config and answers everything the content scripts and
/// the options page ask of the background.
pub struct Coordinator<H, S> {
    bridge: NativeBridge<H>,
    store: S,
    config: RefCell<EditorConfig>,
    /// Whether `config` reflects the store yet. A freshly started worker
    /// answers its waking message before any background reload finishes.
    loaded: Cell<bool>,
}

impl<H: NativeHost, S: SettingsStore> Coordinator<H, S> {
    /// Starts from the default config; the stored one is loaded on first use.
    pub fn new(host: H, store: S) -> Self {
        let mut coordinator =
            Self::with_bridge(NativeBridge::new(host), store, EditorConfig::default());
        coordinator.loaded = Cell::new(false);
        coordinator
    }

    /// Starts from `config` as given, without consulting the store.
    pub fn with_bridge(bridge: NativeBridge<H>, store: S, config: EditorConfig) -> Self {
        Self {
            bridge,
            store,
            config: RefCell::new(config),
            loaded: Cell::new(true),
        }
    }

    /// Snapshot of the current editor config.
    pub fn config(&self) -> EditorConfig {
        self.config.borrow().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the in-memory config with a new `nano` settings value.
    ///
    /// An invalid value leaves the current config in place.
    pub fn apply_settings(&self, value: Value) -> Result<(), ConfigError> {
        let config = EditorConfig::from_value(value)?;
        tracing::info!(command = %config.command, args = ?config.args, "editor config updated");
        *self.config.borrow_mut() = config;
        self.loaded.set(true);
        Ok(())
    }

    /// Load the stored config if nothing has been loaded or applied yet.
    ///
    /// Missing or invalid stored settings leave the default in place.
    async fn ensure_loaded(&self) {
        if self.loaded.get() {
            return;
        }
        if let Err(e) = self.reload().await {
            tracing::debug!("keeping default editor config: {e}");
        }
        self.loaded.set(true);
    }

    /// Re-read the config from the store.
    pub async fn reload(&self) -> Result<(), NanoError> {
        let settings = self.store.load().await?;
        let value = settings
            .get(SETTINGS_KEY)
            .cloned()
            .ok_or(ConfigError::Missing(SETTINGS_KEY))?;
        self.apply_settings(value)?;
        Ok(())
    }

    /// Run the editor on `input` with the current config.
    pub async fn edit(&self, input: &str) -> CommandResult {
        self.ensure_loaded().await;
        // Clone so no borrow is held across the await.
        let config = self.config();
        self.bridge.invoke(&config, input).await
    }

    /// Answer a one-shot runtime message.
    pub async fn handle_message(&self, message: &Value) -> Reply {
        match Request::parse(message) {
            Request::EditTextArea { input } => self.edit(&input).await.into(),
            Request::UnknownAction(action) => {
                tracing::warn!(%action, "unknown action");
                ErrorPayload::unknown_action(&action).into()
            }
            Request::Unknown => {
                tracing::warn!(?message, "unknown request");
                ErrorPayload::unknown_request().into()
            }
        }
    }

    /// Classify a new connection. On `Err`, post the payload once and ignore
    /// the port from then on.
    pub fn connect(&self, name: &str) -> Result<Channel, ErrorPayload> {
        let channel = Channel::from_name(name);
        match &channel {
            Ok(c) => tracing::debug!(channel = c.name(), "connection opened"),
            Err(_) => tracing::warn!(%name, "unknown type of connection"),
        }
        channel
    }

    /// Answer one message on an established connection.
    pub async fn handle_port_message(&self, channel: Channel, message: &Value) -> Reply {
        match channel {
            Channel::Editor => self.handle_message(message).await,
            Channel::Options => self.handle_options(message).await,
        }
    }

    async fn handle_options(&self, message: &Value) -> Reply {
        match OptionsMessage::parse(message) {
            OptionsMessage::Get => {
                self.ensure_loaded().await;
                SettingsReply::from(self.config()).into()
            }
            OptionsMessage::Set(fields) => {
                let config = match EditorConfig::from_value(fields) {
                    Ok(c) => c,
                    Err(e) => return ErrorPayload::new(e.to_string()).into(),
                };
                if let Err(e) = self.store.save(&config.to_settings()).await {
                    tracing::warn!("saving settings failed: {e}");
                    return ErrorPayload::new(e.to_string()).into();
                }
                // The storage change listener re-applies the same value later.
                *self.config.borrow_mut() = config.clone();
                self.loaded.set(true);
                SettingsReply::from(config).into()
            }
            OptionsMessage::Unknown => ErrorPayload::unknown_request().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::error::BridgeError;
    use crate::protocol::{HOST_FAILURE_STATUS, NativeRequest};
    use serde_json::json;

    /// Appends " world" to whatever it is given.
    struct AppendHost;

    impl NativeHost for AppendHost {
        async fn send(&self, _: &str, request: &NativeRequest) -> Result<CommandResult, BridgeError> {
            Ok(CommandResult::success(format!("{} world", request.input)))
        }
    }

    struct DeadHost;

    impl NativeHost for DeadHost {
        async fn send(&self, _: &str, _: &NativeRequest) -> Result<CommandResult, BridgeError> {
            Err(BridgeError::Unreachable("disconnected".into()))
        }
    }

    /// Records the command of every request it is sent.
    #[derive(Default)]
    struct RecordingHost {
        commands: RefCell<Vec<String>>,
    }

    impl NativeHost for &RecordingHost {
        async fn send(&self, _: &str, request: &NativeRequest) -> Result<CommandResult, BridgeError> {
            self.commands.borrow_mut().push(request.command.clone());
            Ok(CommandResult::success(request.input.clone()))
        }
    }

    /// A store whose loads take a turn of the executor, like the browser's.
    struct SlowStore(MemoryStore);

    impl SettingsStore for SlowStore {
        async fn load(&self) -> Result<crate::config::Settings, crate::error::StoreError> {
            tokio::task::yield_now().await;
            self.0.load().await
        }

        async fn save(
            &self,
            settings: &crate::config::Settings,
        ) -> Result<(), crate::error::StoreError> {
            self.0.save(settings).await
        }
    }

    fn stored(config: EditorConfig) -> MemoryStore {
        MemoryStore::new(config.to_settings())
    }

    fn coordinator() -> Coordinator<AppendHost, MemoryStore> {
        Coordinator::new(AppendHost, MemoryStore::default())
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(
            Request::parse(&json!({"type": "action", "action": "editTextArea", "input": "x"})),
            Request::EditTextArea { input: "x".into() }
        );
        assert_eq!(
            Request::parse(&json!({"type": "action", "action": "editTextArea"})),
            Request::EditTextArea { input: String::new() }
        );
        assert_eq!(
            Request::parse(&json!({"type": "action", "action": "fly"})),
            Request::UnknownAction("fly".into())
        );
        assert_eq!(Request::parse(&json!({"type": "bogus"})), Request::Unknown);
        assert_eq!(Request::parse(&json!("not an object")), Request::Unknown);
    }

    #[tokio::test]
    async fn test_bogus_type_is_unknown_request() {
        let reply = coordinator().handle_message(&json!({"type": "bogus"})).await;
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"type": "error", "message": "Unknown request"})
        );
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let reply = coordinator()
            .handle_message(&json!({"type": "action", "action": "openMenu"}))
            .await;
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"type": "error", "message": "Unknown action: openMenu"})
        );
    }

    #[tokio::test]
    async fn test_edit_request_reaches_host() {
        let reply = coordinator()
            .handle_message(&json!({"type": "action", "action": "editTextArea", "input": "hello"}))
            .await;
        assert_eq!(reply, Reply::Result(CommandResult::success("hello world")));
    }

    #[tokio::test]
    async fn test_dead_host_is_failed_result() {
        let c = Coordinator::new(DeadHost, MemoryStore::default());
        let reply = c
            .handle_message(&json!({"type": "action", "action": "editTextArea", "input": "hello"}))
            .await;
        assert_eq!(reply, Reply::Result(CommandResult::failure(HOST_FAILURE_STATUS)));
    }

    #[test]
    fn test_connections() {
        let c = coordinator();
        assert_eq!(c.connect("editor"), Ok(Channel::Editor));
        assert_eq!(c.connect("options"), Ok(Channel::Options));
        assert_eq!(
            serde_json::to_value(c.connect("bogus").unwrap_err()).unwrap(),
            json!({"type": "error", "message": "Unknown type of connection: bogus"})
        );
    }

    #[tokio::test]
    async fn test_editor_channel_edits() {
        let reply = coordinator()
            .handle_port_message(
                Channel::Editor,
                &json!({"type": "action", "action": "editTextArea", "input": "a"}),
            )
            .await;
        assert_eq!(reply, Reply::Result(CommandResult::success("a world")));
    }

    #[tokio::test]
    async fn test_options_get_and_set() {
        let c = coordinator();
        let reply = c
            .handle_port_message(Channel::Options, &json!({"type": "get"}))
            .await;
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"type": "settings", "command": "xterm", "args": ["-e", "nano"]})
        );

        let reply = c
            .handle_port_message(
                Channel::Options,
                &json!({"type": "set", "command": "gvim", "args": ["-f"]}),
            )
            .await;
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"type": "settings", "command": "gvim", "args": ["-f"]})
        );
        assert_eq!(c.config(), EditorConfig::new("gvim", ["-f"]));
        assert_eq!(
            c.store().snapshot().get("nano"),
            Some(&json!({"command": "gvim", "args": ["-f"]}))
        );
    }

    #[tokio::test]
    async fn test_options_set_rejects_empty_command() {
        let c = coordinator();
        let reply = c
            .handle_port_message(Channel::Options, &json!({"type": "set", "command": ""}))
            .await;
        assert!(matches!(reply, Reply::Error(_)));
        assert_eq!(c.config(), EditorConfig::default());
        assert!(c.store().snapshot().is_empty());
    }

    #[test]
    fn test_apply_settings_keeps_old_config_on_error() {
        let c = coordinator();
        c.apply_settings(json!({"command": "code", "args": ["--wait"]}))
            .unwrap();
        assert!(c.apply_settings(json!({"args": []})).is_err());
        assert_eq!(c.config(), EditorConfig::new("code", ["--wait"]));
    }

    #[tokio::test]
    async fn test_reload_from_store() {
        let store = MemoryStore::default();
        store
            .save(&EditorConfig::new("kate", ["-b"]).to_settings())
            .await
            .unwrap();
        let c = Coordinator::new(AppendHost, store);
        c.reload().await.unwrap();
        assert_eq!(c.config(), EditorConfig::new("kate", ["-b"]));
    }

    #[tokio::test]
    async fn test_reload_without_settings_is_error() {
        let c = coordinator();
        assert!(c.reload().await.is_err());
        assert_eq!(c.config(), EditorConfig::default());
    }

    #[tokio::test]
    async fn test_first_edit_waits_for_stored_config() {
        let host = RecordingHost::default();
        let c = Coordinator::new(&host, SlowStore(stored(EditorConfig::new("gvim", ["-f"]))));
        let edit = json!({"type": "action", "action": "editTextArea", "input": "hi"});

        // The worker's own reload races the message that woke it.
        let (reloaded, reply) = tokio::join!(c.reload(), c.handle_message(&edit));

        assert!(reloaded.is_ok());
        assert_eq!(reply, Reply::Result(CommandResult::success("hi")));
        assert_eq!(*host.commands.borrow(), vec!["gvim".to_string()]);
    }

    #[tokio::test]
    async fn test_options_get_reports_stored_config() {
        let c = Coordinator::new(AppendHost, SlowStore(stored(EditorConfig::new("kate", ["-b"]))));
        let reply = c
            .handle_port_message(Channel::Options, &json!({"type": "get"}))
            .await;
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"type": "settings", "command": "kate", "args": ["-b"]})
        );
    }

    #[tokio::test]
    async fn test_first_edit_without_settings_uses_default() {
        let host = RecordingHost::default();
        let c = Coordinator::new(&host, MemoryStore::default());
        c.handle_message(&json!({"type": "action", "action": "editTextArea", "input": "x"}))
            .await;
        assert_eq!(*host.commands.borrow(), vec!["xterm".to_string()]);
    }
}

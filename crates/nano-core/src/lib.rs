//! nano-core: framework-free logic for the nano external-editor extension.
//!
//! This crate provides:
//! - Wire types for content script, background and native host messages
//! - `EditorConfig` and the `SettingsStore` seam for synced settings
//! - `ApplyPolicy`, the named accept/reject rule for editor output
//! - Structural selectors for re-finding elements after a round trip
//! - `EditSession`, the extract / ask / write-back state machine
//! - `NativeBridge` and the `Coordinator` that routes background messages
//!
//! Browser-specific pieces live in `nano-browser`.

pub mod bridge;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod protocol;
pub mod router;
pub mod selector;
pub mod session;
pub mod types;

pub use bridge::{NativeBridge, NativeHost};
pub use config::{
    DEFAULTS_RESOURCE, EditorConfig, MemoryStore, SETTINGS_KEY, Settings, SettingsStore,
    merge_settings,
};
pub use error::{BridgeError, ConfigError, NanoError, StoreError, TargetError};
pub use lifecycle::{CONTEXT_MENU_ID, ContextMenuItem, InstallReason, MenuContext};
pub use policy::{ApplyPolicy, Decision, DiscardReason};
pub use protocol::{
    CommandResult, EditRequest, ErrorPayload, HOST_FAILURE_STATUS, NATIVE_HOST, NativeRequest,
    PageCommand, Reply, SettingsReply,
};
pub use router::{Channel, Coordinator, OptionsMessage, Request};
pub use selector::{ElementTree, StructuralSelector};
pub use session::{EditSession, EditTarget, EditTransport, Located, Outcome, SessionState};
pub use types::{SelectionDirection, TargetKind, TextSelection};

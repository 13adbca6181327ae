//! Browser DOM and extension API layer for nano.
//!
//! This crate implements the `nano-core` seams for a browser extension and
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `locator`: find the focused text control, contenteditable, or selection
//! - `selector`: structural selectors over the live DOM (documents and shadow roots)
//! - `control`: `<input>`/`<textarea>` value and selection access
//! - `cursor`: Selection API save/restore for contenteditable reads
//! - `dom_sync`: write-back of editor output, as `EditTarget`
//! - `events`: synthetic `input`/`paste` events and event-loop yields
//! - `clipboard`: system clipboard fallback
//! - `chrome`: `chrome.*` bindings and JS <-> serde conversion
//! - `storage`, `native`, `transport`: `SettingsStore`, `NativeHost` and
//!   `EditTransport` over the extension APIs
//!
//! # Re-exports
//!
//! This crate re-exports `nano-core` for convenience, so consumers only
//! need to depend on `nano-browser`.

// Re-export core crate
pub use nano_core;
pub use nano_core::*;

pub mod chrome;
pub mod clipboard;
pub mod control;
pub mod cursor;
pub mod dom_sync;
pub mod events;
pub mod locator;
pub mod native;
pub mod selector;
pub mod storage;
pub mod transport;

pub use control::TextControl;
pub use dom_sync::DomTarget;
pub use locator::{deep_active_element, locate};
pub use native::ChromeNativeHost;
pub use selector::TreeRoot;
pub use storage::{SyncStorage, fetch_defaults};
pub use transport::RuntimeTransport;

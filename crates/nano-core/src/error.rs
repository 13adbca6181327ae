//! Error types for nano.
//!
//! Most failure paths in the extension are not errors at all: routing
//! failures become [`ErrorPayload`](crate::protocol::ErrorPayload) replies and
//! host failures become a non-zero [`CommandResult`](crate::CommandResult).
//! The types here cover what is left.

use miette::Diagnostic;

/// Main error type for nano operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum NanoError {
    /// Editor configuration rejected
    #[error(transparent)]
    #[diagnostic_source]
    Config(#[from] ConfigError),

    /// Settings storage failed
    #[error(transparent)]
    #[diagnostic_source]
    Store(#[from] StoreError),

    /// Native host could not be reached or answered garbage
    #[error(transparent)]
    #[diagnostic_source]
    Bridge(#[from] BridgeError),

    /// Edit target could not be written
    #[error(transparent)]
    #[diagnostic_source]
    Target(#[from] TargetError),
}

/// Editor configuration errors.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("editor command is empty")]
    #[diagnostic(
        code(nano::config::empty_command),
        help("set `command` to an executable the native host can find on PATH")
    )]
    EmptyCommand,

    #[error("no `{0}` key in settings")]
    #[diagnostic(code(nano::config::missing))]
    Missing(&'static str),

    #[error("invalid editor settings: {0}")]
    #[diagnostic(code(nano::config::invalid))]
    Invalid(String),
}

/// Settings store errors.
#[derive(thiserror::Error, Debug, Diagnostic, Clone)]
#[error("settings storage failed: {0}")]
#[diagnostic(code(nano::store))]
pub struct StoreError(pub String);

impl From<&str> for StoreError {
    fn from(s: &str) -> Self {
        StoreError(s.to_string())
    }
}

impl From<String> for StoreError {
    fn from(s: String) -> Self {
        StoreError(s)
    }
}

/// Native messaging errors.
#[derive(thiserror::Error, Debug, Diagnostic, Clone)]
pub enum BridgeError {
    #[error("native host unreachable: {0}")]
    #[diagnostic(
        code(nano::bridge::unreachable),
        help("is the native messaging host manifest installed for this browser?")
    )]
    Unreachable(String),

    #[error("malformed reply from native host: {0}")]
    #[diagnostic(code(nano::bridge::malformed))]
    Malformed(String),
}

/// Errors writing text back into the page.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// The structural selector no longer resolves to the node that was read.
    #[error("edit target is no longer in the document")]
    #[diagnostic(code(nano::target::detached))]
    Detached,

    #[error("DOM operation failed: {0}")]
    #[diagnostic(code(nano::target::dom))]
    Dom(String),
}

impl From<&str> for TargetError {
    fn from(s: &str) -> Self {
        TargetError::Dom(s.to_string())
    }
}

impl From<String> for TargetError {
    fn from(s: String) -> Self {
        TargetError::Dom(s)
    }
}

pub type Result<T, E = NanoError> = std::result::Result<T, E>;

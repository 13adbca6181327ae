//! Talking to the native messaging host.

use std::future::Future;

use crate::config::EditorConfig;
use crate::error::BridgeError;
use crate::protocol::{CommandResult, HOST_FAILURE_STATUS, NATIVE_HOST, NativeRequest};

/// Delivers one request to a named native messaging host.
pub trait NativeHost {
    fn send(
        &self,
        host: &str,
        request: &NativeRequest,
    ) -> impl Future<Output = Result<CommandResult, BridgeError>>;
}

/// Runs the configured editor through a [`NativeHost`].
///
/// The config is passed per call rather than held here, so the owner can
/// swap it between calls without the bridge noticing.
#[derive(Debug, Clone)]
pub struct NativeBridge<H> {
    host: H,
    name: String,
}

impl<H: NativeHost> NativeBridge<H> {
    pub fn new(host: H) -> Self {
        Self::with_name(host, NATIVE_HOST)
    }

    pub fn with_name(host: H, name: impl Into<String>) -> Self {
        Self {
            host,
            name: name.into(),
        }
    }

    /// Open `input` in the editor and wait for it to exit.
    ///
    /// Never fails: an unreachable or misbehaving host comes back as a
    /// [`CommandResult`] with [`HOST_FAILURE_STATUS`].
    pub async fn invoke(&self, config: &EditorConfig, input: &str) -> CommandResult {
        let request = NativeRequest::new(config, input);
        tracing::debug!(
            host = %self.name,
            command = %request.command,
            args = ?request.args,
            bytes = request.input.len(),
            "invoking editor"
        );
        match self.host.send(&self.name, &request).await {
            Ok(result) => {
                tracing::debug!(status = result.status, "editor exited");
                result
            }
            Err(e) => {
                tracing::warn!("native host call failed: {e}");
                CommandResult::failure(HOST_FAILURE_STATUS)
            }
        }
    }
}

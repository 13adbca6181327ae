//! `runtime.sendNativeMessage` as a [`NativeHost`].

use nano_core::{BridgeError, CommandResult, NativeHost, NativeRequest};

use crate::chrome;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeNativeHost;

impl NativeHost for ChromeNativeHost {
    async fn send(&self, host: &str, request: &NativeRequest) -> Result<CommandResult, BridgeError> {
        let message =
            chrome::to_js(request).map_err(|e| BridgeError::Malformed(chrome::describe(&e)))?;
        let reply = chrome::send_native_message(host, &message)
            .await
            .map_err(|e| BridgeError::Unreachable(chrome::describe(&e)))?;
        chrome::from_js(reply).map_err(|e| BridgeError::Malformed(chrome::describe(&e)))
    }
}

//! Content script side of the round trip: `runtime.sendMessage`.

use nano_core::{CommandResult, EditRequest, EditTransport, HOST_FAILURE_STATUS, Reply};

use crate::chrome;

/// Sends edit requests to the background coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeTransport;

impl EditTransport for RuntimeTransport {
    async fn round_trip(&self, request: &EditRequest) -> CommandResult {
        let message = match chrome::to_js(request) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("encoding edit request failed: {}", chrome::describe(&e));
                return CommandResult::failure(HOST_FAILURE_STATUS);
            }
        };
        let reply = match chrome::send_message(&message).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("edit request failed: {}", chrome::describe(&e));
                return CommandResult::failure(HOST_FAILURE_STATUS);
            }
        };
        match chrome::from_js::<Reply>(reply) {
            Ok(Reply::Result(result)) => result,
            Ok(Reply::Error(e)) => {
                tracing::warn!("coordinator refused edit: {}", e.message);
                CommandResult::failure(HOST_FAILURE_STATUS)
            }
            Ok(Reply::Settings(_)) => {
                tracing::warn!("unexpected settings reply to edit request");
                CommandResult::failure(HOST_FAILURE_STATUS)
            }
            Err(e) => {
                tracing::warn!("malformed edit reply: {}", chrome::describe(&e));
                CommandResult::failure(HOST_FAILURE_STATUS)
            }
        }
    }
}

//! Wire types exchanged between the content script, the background
//! coordinator and the native messaging host.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;

/// Name the native messaging host is registered under.
pub const NATIVE_HOST: &str = "nano_editor_host";

/// Status reported when the host could not run the command at all.
pub const HOST_FAILURE_STATUS: i32 = -1;

/// Outcome of running the editor: a process exit status plus the edited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub status: i32,
    /// Full post-edit text. Only meaningful when `status == 0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: 0,
            output: Some(output.into()),
        }
    }

    /// A failed run with no usable output.
    pub fn failure(status: i32) -> Self {
        Self {
            status,
            output: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Request sent to the native host.
///
/// The host writes `input` to a private temp file, runs
/// `command args... <file>`, and reads the file back when the exit status
/// is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRequest {
    pub command: String,
    pub args: Vec<String>,
    pub input: String,
    /// Always true: ask the host to send the file contents back.
    pub output: bool,
}

impl NativeRequest {
    pub fn new(config: &EditorConfig, input: impl Into<String>) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            input: input.into(),
            output: true,
        }
    }
}

/// Value of the `type` discriminator on one-shot messages we send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Action,
}

/// Value of the `action` discriminator on action messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionName {
    EditTextArea,
}

impl ActionName {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::EditTextArea => "editTextArea",
        }
    }
}

/// "Edit this text" request from a content script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub action: ActionName,
    /// Omitted when there is no pre-existing text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl EditRequest {
    pub fn edit_text_area(input: &str) -> Self {
        Self {
            kind: MessageType::Action,
            action: ActionName::EditTextArea,
            input: (!input.is_empty()).then(|| input.to_string()),
        }
    }

    pub fn input(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }
}

/// Structured routing error sent back to whoever asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "error")]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unknown_request() -> Self {
        Self::new("Unknown request")
    }

    pub fn unknown_action(action: &str) -> Self {
        Self::new(format!("Unknown action: {action}"))
    }

    pub fn unknown_connection(name: &str) -> Self {
        Self::new(format!("Unknown type of connection: {name}"))
    }
}

/// Reply to a one-shot message or a port message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Result(CommandResult),
    Settings(SettingsReply),
    Error(ErrorPayload),
}

impl From<CommandResult> for Reply {
    fn from(r: CommandResult) -> Self {
        Reply::Result(r)
    }
}

impl From<SettingsReply> for Reply {
    fn from(s: SettingsReply) -> Self {
        Reply::Settings(s)
    }
}

impl From<ErrorPayload> for Reply {
    fn from(e: ErrorPayload) -> Self {
        Reply::Error(e)
    }
}

/// Current editor settings, as sent over the `options` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "settings")]
pub struct SettingsReply {
    pub command: String,
    pub args: Vec<String>,
}

impl From<EditorConfig> for SettingsReply {
    fn from(c: EditorConfig) -> Self {
        Self {
            command: c.command,
            args: c.args,
        }
    }
}

/// Message the background sends to content scripts to start an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageCommand {
    Trigger {
        /// Sent to one chosen frame (context menu) rather than every frame.
        #[serde(rename = "frameTargeted", default, skip_serializing_if = "is_false")]
        frame_targeted: bool,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl PageCommand {
    /// Trigger for every frame of a tab; only the focused one acts.
    pub fn broadcast() -> Self {
        PageCommand::Trigger {
            frame_targeted: false,
        }
    }

    /// Trigger for the single frame the user clicked in.
    pub fn to_frame() -> Self {
        PageCommand::Trigger {
            frame_targeted: true,
        }
    }

    /// Whether the receiving frame should run the edit.
    ///
    /// A broadcast is claimed by the frame whose document has focus, unless
    /// focus sits on a child frame (`active_tag` `IFRAME`/`FRAME`), which
    /// has its own content script. A frame-targeted trigger always runs.
    pub fn runs_here(self, has_focus: bool, active_tag: Option<&str>) -> bool {
        let PageCommand::Trigger { frame_targeted } = self;
        if frame_targeted {
            return true;
        }
        has_focus && !matches!(active_tag, Some("IFRAME" | "FRAME"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_request_wire_shape() {
        let req = EditRequest::edit_text_area("hello");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "action", "action": "editTextArea", "input": "hello"})
        );
    }

    #[test]
    fn test_edit_request_omits_empty_input() {
        let req = EditRequest::edit_text_area("");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "action", "action": "editTextArea"})
        );
        assert_eq!(req.input(), "");
    }

    #[test]
    fn test_native_request_always_asks_for_output() {
        let config = EditorConfig::new("gvim", ["-f"]);
        let req = NativeRequest::new(&config, "text");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"command": "gvim", "args": ["-f"], "input": "text", "output": true})
        );
    }

    #[test]
    fn test_command_result_without_output() {
        let r: CommandResult = serde_json::from_value(json!({"status": 1})).unwrap();
        assert_eq!(r, CommandResult::failure(1));
        assert!(!r.is_success());
    }

    #[test]
    fn test_error_payload_shape() {
        assert_eq!(
            serde_json::to_value(ErrorPayload::unknown_connection("bogus")).unwrap(),
            json!({"type": "error", "message": "Unknown type of connection: bogus"})
        );
    }

    #[test]
    fn test_reply_untagged_parse() {
        let r: Reply = serde_json::from_value(json!({"status": 0, "output": "x"})).unwrap();
        assert_eq!(r, Reply::Result(CommandResult::success("x")));

        let r: Reply =
            serde_json::from_value(json!({"type": "error", "message": "Unknown request"}))
                .unwrap();
        assert_eq!(r, Reply::Error(ErrorPayload::unknown_request()));
    }

    #[test]
    fn test_page_command_shape() {
        assert_eq!(
            serde_json::to_value(PageCommand::broadcast()).unwrap(),
            json!({"type": "trigger"})
        );
        assert_eq!(
            serde_json::to_value(PageCommand::to_frame()).unwrap(),
            json!({"type": "trigger", "frameTargeted": true})
        );
        let parsed: PageCommand = serde_json::from_value(json!({"type": "trigger"})).unwrap();
        assert_eq!(parsed, PageCommand::broadcast());
    }

    #[test]
    fn test_broadcast_needs_focus_in_this_frame() {
        let cmd = PageCommand::broadcast();
        assert!(cmd.runs_here(true, Some("TEXTAREA")));
        assert!(cmd.runs_here(true, None));
        assert!(!cmd.runs_here(false, Some("TEXTAREA")));
        assert!(!cmd.runs_here(true, Some("IFRAME")));
        assert!(!cmd.runs_here(true, Some("FRAME")));
    }

    #[test]
    fn test_frame_targeted_trigger_ignores_focus() {
        let cmd = PageCommand::to_frame();
        assert!(cmd.runs_here(false, Some("BODY")));
        assert!(cmd.runs_here(false, None));
    }
}

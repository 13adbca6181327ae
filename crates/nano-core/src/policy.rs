//! When an editor result is written back into the page.
//!
//! Which `(status, output)` pairs count as "apply" has drifted over time
//! (empty output, a lone newline and unchanged text were each rejected by
//! some versions and not others), so every rule is a named switch here
//! rather than an inline condition at the write site.

use crate::protocol::CommandResult;

/// Why a result was not applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// Non-zero exit status; the user quit without saving, or the host failed.
    Failed(i32),
    /// Success but no output at all.
    Empty,
    /// Output is only whitespace.
    Blank,
    /// Output is a single line break.
    LoneNewline,
    /// Output is the text we sent.
    Unchanged,
}

/// Result of running a [`CommandResult`] through an [`ApplyPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Write this text back.
    Apply(String),
    Discard(DiscardReason),
}

/// Accept/reject rules for editor output.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct ApplyPolicy {
    pub reject_blank: bool,
    pub reject_lone_newline: bool,
    pub reject_unchanged: bool,
    /// Drop the single trailing line break most editors append on save when
    /// the original text had none.
    pub trim_trailing_newline: bool,
}

impl Default for ApplyPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

impl ApplyPolicy {
    /// Every rule on.
    pub fn strict() -> Self {
        Self {
            reject_blank: true,
            reject_lone_newline: true,
            reject_unchanged: true,
            trim_trailing_newline: true,
        }
    }

    /// Only failures and empty output are rejected; text comes back as-is.
    pub fn lenient() -> Self {
        Self {
            reject_blank: false,
            reject_lone_newline: false,
            reject_unchanged: false,
            trim_trailing_newline: false,
        }
    }

    pub fn decide(&self, input: &str, result: &CommandResult) -> Decision {
        if !result.is_success() {
            return Decision::Discard(DiscardReason::Failed(result.status));
        }
        let Some(raw) = result.output.as_deref() else {
            return Decision::Discard(DiscardReason::Empty);
        };
        if raw.is_empty() {
            return Decision::Discard(DiscardReason::Empty);
        }
        if self.reject_lone_newline && (raw == "\n" || raw == "\r\n") {
            return Decision::Discard(DiscardReason::LoneNewline);
        }
        if self.reject_blank && raw.trim().is_empty() {
            return Decision::Discard(DiscardReason::Blank);
        }

        let output = if self.trim_trailing_newline {
            trim_added_newline(input, raw)
        } else {
            raw
        };

        if self.reject_unchanged && output == input {
            return Decision::Discard(DiscardReason::Unchanged);
        }
        Decision::Apply(output.to_string())
    }
}

/// Strip one trailing line break from `output` unless `input` ended with one.
fn trim_added_newline<'a>(input: &str, output: &'a str) -> &'a str {
    if input.ends_with('\n') {
        return output;
    }
    output
        .strip_suffix("\r\n")
        .or_else(|| output.strip_suffix('\n'))
        .unwrap_or(output)
}

//! One edit round trip: extract, ask, maybe write back.
//!
//! ```text
//! Idle -> Located -> AwaitingResult -> Applied   -> Idle
//!   |                              \-> Discarded -> Idle
//!   \-> Idle (nothing to edit)
//! ```

use std::future::Future;

use crate::error::TargetError;
use crate::policy::{ApplyPolicy, Decision, DiscardReason};
use crate::protocol::{CommandResult, EditRequest};
use crate::types::TargetKind;

/// A located element the session can write into.
pub trait EditTarget {
    fn kind(&self) -> TargetKind;

    /// Replace the target's text with `output`, firing whatever events page
    /// scripts need to notice. Fails with [`TargetError::Detached`] when the
    /// element read from can no longer be found.
    fn restore(&self, output: &str) -> impl Future<Output = Result<(), TargetError>>;
}

/// Sends an [`EditRequest`] to the coordinator and waits for the result.
///
/// Transport failures are folded into a failed [`CommandResult`].
pub trait EditTransport {
    fn round_trip(&self, request: &EditRequest) -> impl Future<Output = CommandResult>;
}

/// What the locator found: the text, and where to put it back.
#[derive(Debug, Clone)]
pub struct Located<T> {
    /// `None` for a page selection with no editable element.
    pub target: Option<T>,
    pub text: String,
}

impl<T> Located<T> {
    pub fn element(target: T, text: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            text: text.into(),
        }
    }

    pub fn selection(text: impl Into<String>) -> Self {
        Self {
            target: None,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Located,
    AwaitingResult,
    Applied,
    Discarded,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Located)
                | (Idle, Idle)
                | (Located, AwaitingResult)
                | (AwaitingResult, Applied)
                | (AwaitingResult, Discarded)
                | (Applied, Idle)
                | (Discarded, Idle)
        )
    }
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No editable target and no selection; nothing was sent.
    NothingToEdit,
    /// Output was written into the target.
    Applied,
    /// Output accepted, but there was no element to write to.
    RoundTripOnly,
    Discarded(DiscardReason),
    /// Output accepted but the write failed, usually because the element
    /// went away during the round trip.
    Dropped(TargetError),
}

pub struct EditSession<R> {
    transport: R,
    policy: ApplyPolicy,
    state: SessionState,
}

impl<R: EditTransport> EditSession<R> {
    pub fn new(transport: R) -> Self {
        Self::with_policy(transport, ApplyPolicy::default())
    }

    pub fn with_policy(transport: R, policy: ApplyPolicy) -> Self {
        Self {
            transport,
            policy,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> &ApplyPolicy {
        &self.policy
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(target: "nano::session", from = ?self.state, to = ?next, "transition");
        self.state = next;
    }

    /// Run one edit. `located` is the locator's result for this gesture.
    pub async fn run<T: EditTarget>(&mut self, located: Option<Located<T>>) -> Outcome {
        let Some(located) = located else {
            self.transition(SessionState::Idle);
            tracing::debug!("nothing to edit");
            return Outcome::NothingToEdit;
        };
        self.transition(SessionState::Located);

        let request = EditRequest::edit_text_area(&located.text);
        self.transition(SessionState::AwaitingResult);
        let result = self.transport.round_trip(&request).await;

        let outcome = match self.policy.decide(&located.text, &result) {
            Decision::Discard(reason) => {
                self.transition(SessionState::Discarded);
                tracing::debug!(?reason, status = result.status, "discarding editor result");
                Outcome::Discarded(reason)
            }
            Decision::Apply(output) => {
                self.transition(SessionState::Applied);
                match located.target {
                    None => Outcome::RoundTripOnly,
                    Some(target) => match target.restore(&output).await {
                        Ok(()) => {
                            tracing::debug!(kind = ?target.kind(), "applied editor result");
                            Outcome::Applied
                        }
                        Err(e) => {
                            tracing::debug!("dropping editor result: {e}");
                            Outcome::Dropped(e)
                        }
                    },
                }
            }
        };

        self.transition(SessionState::Idle);
        outcome
    }
}

//! Two-step confirmation for destructive actions.
//!
//! A row action only stages a [`PendingAction`]. The network call may fire
//! only after [`ConfirmationGate::confirm`] hands the staged action back.

use std::fmt;

use thiserror::Error;

use crate::domain::ResourceId;

/// Destructive operations that need an explicit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveKind {
    /// `DELETE` the record.
    Delete,
    /// Reject a pending item.
    Reject,
    /// Approve (confirm) a pending item.
    Approve,
}

impl DestructiveKind {
    /// Imperative verb used in prompts.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Reject => "reject",
            Self::Approve => "approve",
        }
    }

    /// Past tense used in success notifications.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Delete => "deleted",
            Self::Reject => "rejected",
            Self::Approve => "approved",
        }
    }
}

impl fmt::Display for DestructiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A staged destructive action awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    /// What will happen.
    pub kind: DestructiveKind,
    /// Record the action targets.
    pub target_id: ResourceId,
    /// Human label of the target.
    pub target_label: String,
}

impl PendingAction {
    /// Confirmation prompt naming the target.
    pub fn prompt(&self) -> String {
        format!(
            "Really {} {} ({})? Confirm with the record id.",
            self.kind.verb(),
            self.target_label,
            self.target_id
        )
    }
}

/// Reasons a confirmation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmError {
    /// Nothing has been staged.
    #[error("there is no action awaiting confirmation")]
    NothingPending,
    /// The confirmation named a different record.
    #[error("confirmation names {given} but the staged action targets {expected}")]
    TargetMismatch {
        /// Id of the staged target.
        expected: ResourceId,
        /// Id supplied with the confirmation.
        given: ResourceId,
    },
}

/// Holds at most one staged destructive action.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Option<PendingAction>,
}

impl ConfirmationGate {
    /// Stage `action`, replacing any earlier one, and return its prompt.
    pub fn request(&mut self, action: PendingAction) -> String {
        let prompt = action.prompt();
        self.pending = Some(action);
        prompt
    }

    /// Currently staged action.
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Consume the staged action when `target_id` names its target.
    ///
    /// A mismatched confirmation leaves the action staged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmError::NothingPending`] or
    /// [`ConfirmError::TargetMismatch`].
    pub fn confirm(&mut self, target_id: &ResourceId) -> Result<PendingAction, ConfirmError> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(ConfirmError::NothingPending);
        };
        if &pending.target_id != target_id {
            return Err(ConfirmError::TargetMismatch {
                expected: pending.target_id.clone(),
                given: target_id.clone(),
            });
        }
        self.pending.take().ok_or(ConfirmError::NothingPending)
    }

    /// Discard the staged action, returning it when present.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    fn id(raw: &str) -> ResourceId {
        ResourceId::new(raw).expect("valid id")
    }

    #[fixture]
    fn staged() -> ConfirmationGate {
        let mut gate = ConfirmationGate::default();
        gate.request(PendingAction {
            kind: DestructiveKind::Delete,
            target_id: id("pkg-1"),
            target_label: "Ten rides".to_owned(),
        });
        gate
    }

    #[rstest]
    fn prompt_names_the_target(staged: ConfirmationGate) {
        let prompt = staged.pending().expect("staged").prompt();
        assert!(prompt.contains("delete Ten rides (pkg-1)"), "{prompt}");
    }

    #[rstest]
    fn confirm_consumes_the_staged_action(mut staged: ConfirmationGate) {
        let action = staged.confirm(&id("pkg-1")).expect("confirmed");
        assert_eq!(action.kind, DestructiveKind::Delete);
        assert!(staged.pending().is_none());
        assert_eq!(
            staged.confirm(&id("pkg-1")),
            Err(ConfirmError::NothingPending)
        );
    }

    #[rstest]
    fn mismatched_confirmation_keeps_the_action(mut staged: ConfirmationGate) {
        let err = staged.confirm(&id("pkg-2")).expect_err("wrong target");
        assert!(matches!(err, ConfirmError::TargetMismatch { .. }));
        assert!(staged.pending().is_some());
    }

    #[rstest]
    fn cancel_discards(mut staged: ConfirmationGate) {
        assert!(staged.cancel().is_some());
        assert!(staged.pending().is_none());
    }
}

//! Submission state machine for the intake form.

use serde::{Deserialize, Serialize};

/// Where the intake form is in its lifecycle.
///
/// Idle → Editing → Submitting → {Success, Error}. Success and Error go back
/// to Editing when the form is reopened, and Error may resubmit directly.
/// Closing from anywhere returns to Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeState {
    /// Surface closed.
    #[default]
    Idle,
    Editing,
    /// Request in flight; the submit control is disabled.
    Submitting,
    Success,
    Error,
}

impl IntakeState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: IntakeState) -> bool {
        use IntakeState::*;
        matches!(
            (self, target),
            (Idle, Editing)
                | (Editing, Submitting)
                | (Editing, Error)
                | (Submitting, Success)
                | (Submitting, Error)
                | (Success, Editing)
                | (Error, Editing)
                | (Error, Submitting)
                | (_, Idle)
        )
    }

    /// Whether the intake surface is visible in this state.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Editing | Self::Submitting | Self::Error)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

impl std::fmt::Display for IntakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

//! Start date screen state machine.

use serde::Serialize;

use super::model::StartDate;
use crate::error::OnboardingError;

/// Phases of the confirmation workflow.
///
/// Progresses linearly: AwaitingInput → Confirming → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationPhase {
    AwaitingInput,
    Confirming,
    Completed,
}

impl ConfirmationPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: ConfirmationPhase) -> bool {
        use ConfirmationPhase::*;
        matches!(
            (self, target),
            (AwaitingInput, Confirming) | (Confirming, Completed)
        )
    }
}

impl Default for ConfirmationPhase {
    fn default() -> Self {
        Self::AwaitingInput
    }
}

impl std::fmt::Display for ConfirmationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingInput => "awaiting_input",
            Self::Confirming => "confirming",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Session-local state of the start date screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenState {
    /// Value currently selected in the date control.
    pub picked: Option<StartDate>,
    /// Value committed by the confirmation gesture.
    pub confirmed: Option<StartDate>,
    /// The date control is interactive iff this is true.
    pub modal_visible: bool,
    pub phase: ConfirmationPhase,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            picked: None,
            confirmed: None,
            modal_visible: true,
            phase: ConfirmationPhase::default(),
        }
    }
}

impl ScreenState {
    /// Apply a change event from the date control.
    ///
    /// Rejected once the modal is closed, since the control is no longer
    /// interactive.
    pub fn select(&mut self, date: Option<StartDate>) -> Result<(), OnboardingError> {
        if !self.modal_visible {
            return Err(OnboardingError::InvalidPhase {
                phase: self.phase.to_string(),
                action: "change the start date".into(),
            });
        }
        self.picked = date;
        Ok(())
    }

    /// Enter `Confirming`: snapshot the picked date and close the modal.
    ///
    /// Returns the confirmed date. Proceeds when nothing was picked.
    pub fn begin_confirmation(&mut self) -> Result<Option<StartDate>, OnboardingError> {
        self.transition(ConfirmationPhase::Confirming, "confirm")?;
        self.confirmed = self.picked;
        self.modal_visible = false;
        Ok(self.confirmed)
    }

    /// Enter `Completed` once both collaborator calls have settled.
    pub fn complete(&mut self) -> Result<(), OnboardingError> {
        self.transition(ConfirmationPhase::Completed, "complete")
    }

    fn transition(
        &mut self,
        target: ConfirmationPhase,
        action: &str,
    ) -> Result<(), OnboardingError> {
        if !self.phase.can_transition_to(target) {
            return Err(OnboardingError::InvalidPhase {
                phase: self.phase.to_string(),
                action: action.to_string(),
            });
        }
        self.phase = target;
        Ok(())
    }
}

//! Error types for the start date onboarding screen.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures observed while running the confirmation workflow.
///
/// None of these stop the workflow. They are logged and collected into a
/// [`ConfirmationReport`](crate::onboarding::ConfirmationReport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("Persisting the start date failed: {reason}")]
    PersistDateFailed { reason: String },

    #[error("Triggering email fetch for user {user_id} failed: {reason}")]
    FetchEmailsFailed { user_id: String, reason: String },

    #[error("Confirmed without selecting a start date")]
    NoDateSelected,

    #[error("Screen is in phase {phase}, cannot {action}")]
    InvalidPhase { phase: String, action: String },

    #[error("Confirmation was begun on a different screen")]
    ForeignConfirmation,
}

impl OnboardingError {
    /// Warnings are reported but describe an accepted input, not a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoDateSelected)
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

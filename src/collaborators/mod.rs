//! Outbound collaborators of the start date screen.
//!
//! The screen only knows these traits. `HttpBackend` implements both against
//! the real endpoints; tests substitute their own doubles.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::OnboardingError;
use crate::onboarding::model::StartDate;

/// Durable storage of the job search start date.
#[async_trait]
pub trait DateStore: Send + Sync {
    /// Persist the confirmed date. `None` is sent as an explicit null.
    async fn persist_start_date(&self, date: Option<StartDate>) -> Result<(), OnboardingError>;
}

/// Kicks off retrieval of the user's messages from the stored start date on.
#[async_trait]
pub trait EmailIngestionTrigger: Send + Sync {
    async fn trigger_fetch(&self, user_id: &str) -> Result<(), OnboardingError>;
}

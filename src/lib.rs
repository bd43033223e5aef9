//! Job search start date onboarding screen.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod identity;
pub mod navigation;
pub mod onboarding;
pub mod terminal;

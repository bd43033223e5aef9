//! Start date onboarding screen.
//!
//! A modal asks a new user when their job search started. Confirming closes
//! the modal, persists the date, asks ingestion to fetch emails from that
//! date on, and replaces the current route with the processing screen.

pub mod date_picker;
pub mod model;
pub mod routes;
pub mod state;
pub mod view;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use date_picker::DatePicker;
pub use model::{FetchEmailsRequest, StartDate, StartDateRequest};
pub use routes::{StartDateRouteState, start_date_routes};
pub use state::{ConfirmationPhase, ScreenState};
pub use view::{View, render};
pub use workflow::{Confirmation, ConfirmationReport, ScreenDeps, StartDateScreen};

//! Rendering of the start date screen.

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{DEFAULT_LOOKBACK_DAYS, StartDate};
use super::state::ScreenState;

/// Placeholder shown when no start date was confirmed.
pub const NOT_SET: &str = "not set";

/// What the screen displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Blocking modal with the date control and the confirm action.
    StartDateModal { picked: Option<StartDate> },
    /// Summary shown once the modal has closed.
    Dashboard { summary: String },
}

/// Render the screen. Depends only on the state passed in.
pub fn render(state: &ScreenState) -> View {
    if state.modal_visible {
        View::StartDateModal {
            picked: state.picked,
        }
    } else {
        View::Dashboard {
            summary: summary_line(state.confirmed),
        }
    }
}

fn summary_line(confirmed: Option<StartDate>) -> String {
    let date = confirmed
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_SET.to_string());
    format!("Job search start date: {date}")
}

/// Hint shown under the date control.
pub fn lookback_hint(today: NaiveDate) -> String {
    format!(
        "Leave empty to scan the last {} days (since {}).",
        DEFAULT_LOOKBACK_DAYS,
        StartDate::default_lookback(today)
    )
}

impl View {
    pub fn is_modal(&self) -> bool {
        matches!(self, Self::StartDateModal { .. })
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartDateModal { picked } => {
                writeln!(f, "When did you start your job search?")?;
                match picked {
                    Some(date) => writeln!(f, "  Selected: {date}")?,
                    None => writeln!(f, "  Selected: {NOT_SET}")?,
                }
                write!(f, "  [confirm]")
            }
            Self::Dashboard { summary } => write!(f, "{summary}"),
        }
    }
}

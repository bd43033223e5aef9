//! Start date and collaborator request models.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lookback the ingestion side applies when no start date has been stored.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365 * 2;

/// Wire and display format of a calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A job search start date: year, month and day with no time or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StartDate(NaiveDate);

impl StartDate {
    /// Build from year, month and day. `None` if the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse an ISO calendar string (`YYYY-MM-DD`).
    pub fn parse(input: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map(Self)
    }

    /// The date the ingestion side falls back to when none is stored.
    ///
    /// Display only. Never sent to a collaborator.
    pub fn default_lookback(today: NaiveDate) -> Self {
        Self(today - Duration::days(DEFAULT_LOOKBACK_DAYS))
    }
}

impl std::fmt::Display for StartDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Body of the date-persistence call. An unset date serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDateRequest {
    pub start_date: Option<StartDate>,
}

/// Body of the email-ingestion trigger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchEmailsRequest {
    pub user_id: String,
}

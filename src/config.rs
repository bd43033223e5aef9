//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default base URL of the backend hosting the collaborator endpoints.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Default path of the date-persistence endpoint.
pub const DEFAULT_START_DATE_PATH: &str = "/set-start-date";
/// Default path of the email-ingestion trigger endpoint.
pub const DEFAULT_FETCH_EMAILS_PATH: &str = "/fetch-emails";

/// Onboarding screen configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Base URL of the backend, without trailing slash.
    pub api_base_url: String,
    /// Path of the date-persistence endpoint.
    pub start_date_path: String,
    /// Path of the email-ingestion trigger endpoint.
    pub fetch_emails_path: String,
    /// Identifier of the signed-in user, if known.
    pub user_id: Option<String>,
    /// Session token sent as the `Authorization` cookie.
    pub session_token: Option<SecretString>,
    /// Per-request timeout for collaborator calls.
    pub request_timeout: Duration,
    /// Port for the JSON surface of the screen. Disabled when `None`.
    pub http_port: Option<u16>,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            start_date_path: DEFAULT_START_DATE_PATH.to_string(),
            fetch_emails_path: DEFAULT_FETCH_EMAILS_PATH.to_string(),
            user_id: None,
            session_token: None,
            request_timeout: Duration::from_secs(30),
            http_port: None,
        }
    }
}

impl OnboardingConfig {
    /// Build configuration from `ONBOARDING_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = non_empty("ONBOARDING_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let start_date_path = non_empty("ONBOARDING_START_DATE_PATH")
            .map(normalize_path)
            .unwrap_or(defaults.start_date_path);

        let fetch_emails_path = non_empty("ONBOARDING_FETCH_EMAILS_PATH")
            .map(normalize_path)
            .unwrap_or(defaults.fetch_emails_path);

        let request_timeout = match non_empty("ONBOARDING_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ONBOARDING_HTTP_TIMEOUT_SECS".into(),
                    message: format!("expected a whole number of seconds, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let http_port = non_empty("ONBOARDING_HTTP_PORT")
            .map(|raw| {
                raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                    key: "ONBOARDING_HTTP_PORT".into(),
                    message: format!("expected a port number, got {raw:?}"),
                })
            })
            .transpose()?;

        Ok(Self {
            api_base_url,
            start_date_path,
            fetch_emails_path,
            user_id: non_empty("ONBOARDING_USER_ID"),
            session_token: non_empty("ONBOARDING_SESSION_TOKEN").map(SecretString::from),
            request_timeout,
            http_port,
        })
    }

    /// Full URL of the date-persistence endpoint.
    pub fn start_date_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.start_date_path)
    }

    /// Full URL of the email-ingestion trigger endpoint.
    pub fn fetch_emails_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.fetch_emails_path)
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

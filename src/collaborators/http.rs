//! HTTP implementation of the collaborator traits.
//!
//! Both calls are JSON `POST`s. Response bodies are never read; a non-2xx
//! status is reported as a failure of that call and nothing more.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use secrecy::{ExposeSecret, SecretString};

use super::{DateStore, EmailIngestionTrigger};
use crate::config::OnboardingConfig;
use crate::error::OnboardingError;
use crate::onboarding::model::{FetchEmailsRequest, StartDate, StartDateRequest};

/// Name of the session cookie issued at login.
const SESSION_COOKIE: &str = "Authorization";

/// Talks to the backend's date-persistence and email-ingestion endpoints.
pub struct HttpBackend {
    client: reqwest::Client,
    start_date_url: String,
    fetch_emails_url: String,
    session_token: Option<SecretString>,
}

impl HttpBackend {
    pub fn new(config: &OnboardingConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            start_date_url: config.start_date_url(),
            fetch_emails_url: config.fetch_emails_url(),
            session_token: config.session_token.clone(),
        })
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(url);
        match &self.session_token {
            Some(token) => request.header(
                COOKIE,
                format!("{SESSION_COOKIE}={}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Send a JSON body and map transport errors and non-2xx statuses.
    async fn send_json<T: serde::Serialize + Sync>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::StatusCode, String> {
        let resp = self
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("{url} returned {status}"));
        }
        Ok(status)
    }
}

#[async_trait]
impl DateStore for HttpBackend {
    async fn persist_start_date(&self, date: Option<StartDate>) -> Result<(), OnboardingError> {
        let body = StartDateRequest { start_date: date };
        let status = self
            .send_json(&self.start_date_url, &body)
            .await
            .map_err(|reason| OnboardingError::PersistDateFailed { reason })?;
        tracing::debug!(status = %status, "Start date accepted");
        Ok(())
    }
}

#[async_trait]
impl EmailIngestionTrigger for HttpBackend {
    async fn trigger_fetch(&self, user_id: &str) -> Result<(), OnboardingError> {
        let body = FetchEmailsRequest {
            user_id: user_id.to_string(),
        };
        let status = self
            .send_json(&self.fetch_emails_url, &body)
            .await
            .map_err(|reason| OnboardingError::FetchEmailsFailed {
                user_id: user_id.to_string(),
                reason,
            })?;
        tracing::debug!(status = %status, "Email fetch accepted");
        Ok(())
    }
}

//! Test doubles for the screen's collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use super::model::StartDate;
use super::workflow::{ScreenDeps, StartDateScreen};
use crate::collaborators::{DateStore, EmailIngestionTrigger};
use crate::error::OnboardingError;
use crate::identity::UserIdentity;
use crate::navigation::{Navigator, Route};

/// One observed collaborator interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PersistStarted(Option<StartDate>),
    PersistSettled,
    FetchStarted(String),
    FetchSettled,
    Navigated(Route),
}

type CallLog = Arc<Mutex<Vec<Call>>>;

/// Lets a test hold the persist call open.
#[derive(Default)]
struct Gate {
    started: Notify,
    release: Notify,
}

struct MockDateStore {
    log: CallLog,
    fail: bool,
    delay: Option<Duration>,
    gate: Option<Arc<Gate>>,
}

#[async_trait]
impl DateStore for MockDateStore {
    async fn persist_start_date(&self, date: Option<StartDate>) -> Result<(), OnboardingError> {
        self.log.lock().await.push(Call::PersistStarted(date));
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().await.push(Call::PersistSettled);
        if self.fail {
            return Err(OnboardingError::PersistDateFailed {
                reason: "simulated network error".into(),
            });
        }
        Ok(())
    }
}

struct MockIngestion {
    log: CallLog,
    fail: bool,
}

#[async_trait]
impl EmailIngestionTrigger for MockIngestion {
    async fn trigger_fetch(&self, user_id: &str) -> Result<(), OnboardingError> {
        self.log.lock().await.push(Call::FetchStarted(user_id.to_string()));
        self.log.lock().await.push(Call::FetchSettled);
        if self.fail {
            return Err(OnboardingError::FetchEmailsFailed {
                user_id: user_id.to_string(),
                reason: "simulated 503".into(),
            });
        }
        Ok(())
    }
}

struct MockNavigator {
    log: CallLog,
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn replace(&self, route: Route) {
        self.log.lock().await.push(Call::Navigated(route));
    }
}

/// A screen wired to recording doubles.
pub struct Harness {
    pub screen: Arc<StartDateScreen>,
    log: CallLog,
    gate: Arc<Gate>,
}

#[derive(Default)]
pub struct HarnessBuilder {
    fail_persist: bool,
    fail_fetch: bool,
    persist_delay: Option<Duration>,
    hold_persist: bool,
}

impl HarnessBuilder {
    pub fn fail_persist(mut self) -> Self {
        self.fail_persist = true;
        self
    }

    pub fn fail_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn persist_delay(mut self, delay: Duration) -> Self {
        self.persist_delay = Some(delay);
        self
    }

    /// Block the persist call until [`Harness::release_persist`].
    pub fn hold_persist(mut self) -> Self {
        self.hold_persist = true;
        self
    }

    pub fn build(self) -> Harness {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Gate::default());
        let deps = ScreenDeps {
            date_store: Arc::new(MockDateStore {
                log: Arc::clone(&log),
                fail: self.fail_persist,
                delay: self.persist_delay,
                gate: self.hold_persist.then(|| Arc::clone(&gate)),
            }),
            ingestion: Arc::new(MockIngestion {
                log: Arc::clone(&log),
                fail: self.fail_fetch,
            }),
            navigator: Arc::new(MockNavigator {
                log: Arc::clone(&log),
            }),
        };
        Harness {
            screen: Arc::new(StartDateScreen::new(deps, UserIdentity::configured("user-42"))),
            log,
            gate,
        }
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.log.lock().await.clone()
    }

    pub async fn navigations(&self) -> usize {
        self.log
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, Call::Navigated(_)))
            .count()
    }

    pub async fn wait_for_persist_start(&self) {
        self.gate.started.notified().await;
    }

    pub fn release_persist(&self) {
        self.gate.release.notify_one();
    }

    /// Poll until navigation happened, for workflows running in the background.
    pub async fn wait_for_navigation(&self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.navigations().await == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("workflow never navigated");
    }
}

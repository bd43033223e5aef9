//! The start date screen: owns screen state and runs the confirmation workflow.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use super::model::StartDate;
use super::state::ScreenState;
use super::view::{self, View};
use crate::collaborators::{DateStore, EmailIngestionTrigger};
use crate::error::OnboardingError;
use crate::identity::UserIdentity;
use crate::navigation::{Navigator, Route};

/// Collaborators injected into the screen.
#[derive(Clone)]
pub struct ScreenDeps {
    pub date_store: Arc<dyn DateStore>,
    pub ingestion: Arc<dyn EmailIngestionTrigger>,
    pub navigator: Arc<dyn Navigator>,
}

/// Outcome of one confirmation, for callers and logs. Never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationReport {
    pub confirmed: Option<StartDate>,
    pub user_id: String,
    /// Warnings and call failures, in the order they occurred.
    pub issues: Vec<OnboardingError>,
    pub navigated_to: Route,
}

impl ConfirmationReport {
    /// True when both calls succeeded and a date was selected.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OnboardingError> {
        self.issues.iter().filter(|e| !e.is_warning())
    }
}

/// Proof that the screen entered `Confirming`.
///
/// Only [`StartDateScreen::begin_confirmation`] hands one out, and
/// [`StartDateScreen::finish_confirmation`] consumes it, so the calls and the
/// navigation run at most once per confirmation.
#[derive(Debug)]
#[must_use = "the confirmation only completes once passed to finish_confirmation"]
pub struct Confirmation {
    screen_id: Uuid,
    date: Option<StartDate>,
}

impl Confirmation {
    /// The date snapshotted when the modal closed.
    pub fn date(&self) -> Option<StartDate> {
        self.date
    }
}

/// The job search start date onboarding screen.
pub struct StartDateScreen {
    id: Uuid,
    state: Arc<RwLock<ScreenState>>,
    deps: ScreenDeps,
    user: UserIdentity,
    settled: watch::Sender<bool>,
}

impl StartDateScreen {
    pub fn new(deps: ScreenDeps, user: UserIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Arc::new(RwLock::new(ScreenState::default())),
            deps,
            user,
            settled: watch::channel(false).0,
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> ScreenState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> View {
        view::render(&*self.state.read().await)
    }

    /// Change handler of the date control.
    pub async fn select(&self, date: Option<StartDate>) -> Result<View, OnboardingError> {
        let mut state = self.state.write().await;
        state.select(date)?;
        tracing::debug!(picked = ?date, "Start date picked");
        Ok(view::render(&state))
    }

    /// Confirmation gesture: run the whole workflow and return its report.
    ///
    /// The dashboard is rendered as soon as this is called, while both
    /// calls are still pending. Fails only if the screen was already
    /// confirmed.
    pub async fn confirm(&self) -> Result<ConfirmationReport, OnboardingError> {
        let confirmation = self.begin_confirmation().await?;
        self.finish_confirmation(confirmation).await
    }

    /// `AwaitingInput → Confirming`: snapshot the pick and close the modal.
    pub async fn begin_confirmation(&self) -> Result<Confirmation, OnboardingError> {
        let date = self.state.write().await.begin_confirmation()?;
        tracing::info!(start_date = ?date, "Start date confirmed");
        Ok(Confirmation {
            screen_id: self.id,
            date,
        })
    }

    /// Persist the date, then trigger ingestion, then navigate away.
    ///
    /// Each step runs whether or not the previous one succeeded. The fetch
    /// call is not issued until the persist call has settled. Rejects a
    /// confirmation begun on another screen before issuing any call.
    pub async fn finish_confirmation(
        &self,
        confirmation: Confirmation,
    ) -> Result<ConfirmationReport, OnboardingError> {
        if confirmation.screen_id != self.id {
            return Err(OnboardingError::ForeignConfirmation);
        }
        let confirmed = confirmation.date;
        let mut issues = Vec::new();

        if confirmed.is_none() {
            tracing::warn!("Confirmed without a start date; persisting null");
            issues.push(OnboardingError::NoDateSelected);
        }

        if let Err(e) = self.deps.date_store.persist_start_date(confirmed).await {
            tracing::error!(error = %e, "Persisting start date failed");
            issues.push(e);
        }

        let user_id = self.user.user_id.as_str();
        if let Err(e) = self.deps.ingestion.trigger_fetch(user_id).await {
            tracing::error!(error = %e, "Triggering email fetch failed");
            issues.push(e);
        }

        self.state.write().await.complete()?;
        let route = Route::Processing;
        self.deps.navigator.replace(route).await;
        self.settled.send_replace(true);

        Ok(ConfirmationReport {
            confirmed,
            user_id: user_id.to_string(),
            issues,
            navigated_to: route,
        })
    }

    /// Wait until a confirmation, begun by any front end, has navigated away.
    pub async fn settled(&self) {
        let mut rx = self.settled.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|done| *done).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::onboarding::state::ConfirmationPhase;
    use crate::onboarding::testing::{Call, Harness};

    fn date(s: &str) -> Option<StartDate> {
        Some(StartDate::parse(s).unwrap())
    }

    #[tokio::test]
    async fn opens_with_modal() {
        let h = Harness::new();
        let view = h.screen.view().await;
        assert_eq!(view, View::StartDateModal { picked: None });
        assert!(h.calls().await.is_empty());
    }

    #[tokio::test]
    async fn happy_path_persists_fetches_then_navigates() {
        let h = Harness::new();
        h.screen.select(date("2024-03-15")).await.unwrap();

        let report = h.screen.confirm().await.unwrap();

        assert!(report.is_clean());
        assert_eq!(report.confirmed, date("2024-03-15"));
        assert_eq!(report.navigated_to, Route::Processing);
        assert_eq!(
            h.calls().await,
            vec![
                Call::PersistStarted(date("2024-03-15")),
                Call::PersistSettled,
                Call::FetchStarted("user-42".into()),
                Call::FetchSettled,
                Call::Navigated(Route::Processing),
            ]
        );
        assert_eq!(
            h.screen.view().await.to_string(),
            "Job search start date: 2024-03-15"
        );
        assert_eq!(h.screen.state().await.phase, ConfirmationPhase::Completed);
    }

    #[tokio::test]
    async fn confirmed_equals_last_change() {
        let h = Harness::new();
        for d in ["2023-06-01", "2024-01-10", "2024-02-29"] {
            h.screen.select(date(d)).await.unwrap();
        }
        let report = h.screen.confirm().await.unwrap();
        assert_eq!(report.confirmed, date("2024-02-29"));
    }

    #[tokio::test]
    async fn confirm_without_date_sends_null_and_completes() {
        let h = Harness::new();
        let report = h.screen.confirm().await.unwrap();

        assert_eq!(report.confirmed, None);
        assert_eq!(report.issues, vec![OnboardingError::NoDateSelected]);
        assert_eq!(report.failures().count(), 0);
        assert_eq!(h.calls().await[0], Call::PersistStarted(None));
        assert_eq!(h.navigations().await, 1);
    }

    #[tokio::test]
    async fn clearing_the_control_confirms_nothing() {
        let h = Harness::new();
        h.screen.select(date("2024-03-15")).await.unwrap();
        h.screen.select(None).await.unwrap();
        let report = h.screen.confirm().await.unwrap();
        assert_eq!(report.confirmed, None);
    }

    #[tokio::test]
    async fn persist_failure_still_fetches_and_navigates() {
        let h = Harness::builder().fail_persist().build();
        h.screen.select(date("2024-03-15")).await.unwrap();

        let report = h.screen.confirm().await.unwrap();

        assert_eq!(report.failures().count(), 1);
        assert!(matches!(
            report.issues[0],
            OnboardingError::PersistDateFailed { .. }
        ));
        let calls = h.calls().await;
        assert!(calls.contains(&Call::FetchStarted("user-42".into())));
        assert_eq!(calls.last(), Some(&Call::Navigated(Route::Processing)));
        // Failures never reach the rendered view.
        assert_eq!(
            h.screen.view().await.to_string(),
            "Job search start date: 2024-03-15"
        );
    }

    #[tokio::test]
    async fn both_failures_still_navigate_once() {
        let h = Harness::builder().fail_persist().fail_fetch().build();
        let report = h.screen.confirm().await.unwrap();

        assert_eq!(report.failures().count(), 2);
        assert!(matches!(
            report.issues.last(),
            Some(OnboardingError::FetchEmailsFailed { .. })
        ));
        assert_eq!(h.navigations().await, 1);
    }

    #[tokio::test]
    async fn fetch_failure_alone_still_navigates_once() {
        let h = Harness::builder().fail_fetch().build();
        h.screen.select(date("2024-03-15")).await.unwrap();

        let report = h.screen.confirm().await.unwrap();

        assert_eq!(
            report.issues,
            vec![OnboardingError::FetchEmailsFailed {
                user_id: "user-42".into(),
                reason: "simulated 503".into(),
            }]
        );
        assert!(h.calls().await.contains(&Call::PersistSettled));
        assert_eq!(h.navigations().await, 1);
        assert_eq!(h.screen.state().await.phase, ConfirmationPhase::Completed);
    }

    #[tokio::test]
    async fn fetch_waits_for_slow_persist() {
        let h = Harness::builder()
            .persist_delay(Duration::from_millis(100))
            .build();
        h.screen.select(date("2024-03-15")).await.unwrap();
        h.screen.confirm().await.unwrap();

        let calls = h.calls().await;
        let settled = calls.iter().position(|c| *c == Call::PersistSettled).unwrap();
        let fetch = calls
            .iter()
            .position(|c| matches!(c, Call::FetchStarted(_)))
            .unwrap();
        assert!(settled < fetch, "fetch started before persist settled: {calls:?}");
    }

    #[tokio::test]
    async fn dashboard_visible_while_calls_pending() {
        let h = Harness::builder().hold_persist().build();
        h.screen.select(date("2024-03-15")).await.unwrap();

        let screen = Arc::clone(&h.screen);
        let task = tokio::spawn(async move { screen.confirm().await });

        h.wait_for_persist_start().await;
        let state = h.screen.state().await;
        assert!(!state.modal_visible);
        assert_eq!(state.phase, ConfirmationPhase::Confirming);
        assert_eq!(
            h.screen.view().await.to_string(),
            "Job search start date: 2024-03-15"
        );
        assert_eq!(h.navigations().await, 0);
        assert!(!h.calls().await.iter().any(|c| matches!(c, Call::FetchStarted(_))));

        h.release_persist();
        let report = task.await.unwrap().unwrap();
        assert!(report.is_clean());
        assert_eq!(h.navigations().await, 1);
    }

    #[tokio::test]
    async fn second_confirm_is_rejected_without_side_effects() {
        let h = Harness::new();
        h.screen.confirm().await.unwrap();
        let before = h.calls().await.len();

        let err = h.screen.confirm().await.unwrap_err();
        assert!(matches!(err, OnboardingError::InvalidPhase { .. }));
        assert_eq!(h.calls().await.len(), before);
        assert_eq!(h.navigations().await, 1);
    }

    #[tokio::test]
    async fn select_after_confirm_is_rejected() {
        let h = Harness::new();
        h.screen.select(date("2024-03-15")).await.unwrap();
        h.screen.confirm().await.unwrap();

        assert!(h.screen.select(date("2020-01-01")).await.is_err());
        assert_eq!(h.screen.state().await.confirmed, date("2024-03-15"));
    }

    #[tokio::test]
    async fn confirmation_from_another_screen_is_rejected() {
        let a = Harness::new();
        let b = Harness::new();
        let confirmation = a.screen.begin_confirmation().await.unwrap();
        let _own = b.screen.begin_confirmation().await.unwrap();

        let err = b.screen.finish_confirmation(confirmation).await.unwrap_err();
        assert_eq!(err, OnboardingError::ForeignConfirmation);
        assert!(b.calls().await.is_empty());
        assert_eq!(b.navigations().await, 0);
        assert_eq!(b.screen.state().await.phase, ConfirmationPhase::Confirming);
    }

    #[tokio::test]
    async fn confirmation_carries_the_snapshot() {
        let h = Harness::new();
        h.screen.select(date("2024-03-15")).await.unwrap();
        let confirmation = h.screen.begin_confirmation().await.unwrap();
        assert_eq!(confirmation.date(), date("2024-03-15"));

        // Modal closed, no call issued yet.
        assert!(!h.screen.state().await.modal_visible);
        assert!(h.calls().await.is_empty());

        let report = h.screen.finish_confirmation(confirmation).await.unwrap();
        assert_eq!(report.confirmed, date("2024-03-15"));
        assert_eq!(h.navigations().await, 1);
    }

    #[tokio::test]
    async fn settled_resolves_after_navigation() {
        let h = Harness::builder().hold_persist().build();
        let screen = Arc::clone(&h.screen);
        let task = tokio::spawn(async move { screen.confirm().await });

        h.wait_for_persist_start().await;
        let waiter = {
            let screen = Arc::clone(&h.screen);
            tokio::spawn(async move { screen.settled().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        h.release_persist();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(h.navigations().await, 1);
        task.await.unwrap().unwrap();
    }
}

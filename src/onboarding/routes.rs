//! REST endpoints driving the start date screen.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use super::model::StartDate;
use super::view::{View, lookback_hint};
use super::workflow::StartDateScreen;
use crate::error::OnboardingError;

/// Shared state for start date routes.
#[derive(Clone)]
pub struct StartDateRouteState {
    pub screen: Arc<StartDateScreen>,
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    #[serde(default)]
    date: Option<String>,
}

/// JSON form of the screen, with the lookback hint while the modal is up.
#[derive(Debug, Serialize)]
struct ScreenResponse {
    #[serde(flatten)]
    view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

fn screen_json(view: View) -> ScreenResponse {
    let hint = view
        .is_modal()
        .then(|| lookback_hint(chrono::Local::now().date_naive()));
    ScreenResponse { view, hint }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

fn phase_conflict(err: OnboardingError) -> Response {
    error_response(StatusCode::CONFLICT, err.to_string())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "start-date-onboarding"
    }))
}

/// GET /api/onboarding/start-date
async fn get_view(State(state): State<StartDateRouteState>) -> impl IntoResponse {
    Json(screen_json(state.screen.view().await))
}

/// POST /api/onboarding/start-date/select
///
/// Body `{"date": "YYYY-MM-DD"}`; a null or missing date clears the pick.
async fn select_date(
    State(state): State<StartDateRouteState>,
    Json(req): Json<SelectRequest>,
) -> Response {
    let date = match req.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => match StartDate::parse(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid date {raw:?}: {e}"),
                );
            }
        },
        None => None,
    };

    match state.screen.select(date).await {
        Ok(view) => Json(screen_json(view)).into_response(),
        Err(e) => phase_conflict(e),
    }
}

/// POST /api/onboarding/start-date/confirm
///
/// Closes the modal and answers with the dashboard right away. The
/// collaborator calls and navigation continue in the background.
async fn confirm(State(state): State<StartDateRouteState>) -> Response {
    let confirmation = match state.screen.begin_confirmation().await {
        Ok(confirmation) => confirmation,
        Err(e) => return phase_conflict(e),
    };

    let screen = Arc::clone(&state.screen);
    tokio::spawn(async move {
        match screen.finish_confirmation(confirmation).await {
            Ok(report) => tracing::info!(
                issues = report.issues.len(),
                navigated_to = %report.navigated_to,
                "Start date onboarding finished"
            ),
            Err(e) => tracing::error!(error = %e, "Start date onboarding did not finish"),
        }
    });

    (StatusCode::ACCEPTED, Json(screen_json(state.screen.view().await))).into_response()
}

/// Build the start date REST routes.
pub fn start_date_routes(state: StartDateRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/start-date", get(get_view))
        .route("/api/onboarding/start-date/select", post(select_date))
        .route("/api/onboarding/start-date/confirm", post(confirm))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

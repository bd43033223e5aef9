use std::sync::Arc;

use start_date_onboarding::collaborators::HttpBackend;
use start_date_onboarding::config::OnboardingConfig;
use start_date_onboarding::identity::UserIdentity;
use start_date_onboarding::navigation::{History, Route};
use start_date_onboarding::onboarding::{
    ConfirmationPhase, ScreenDeps, StartDateRouteState, StartDateScreen, start_date_routes,
};
use start_date_onboarding::terminal::TerminalScreen;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env()?;

    eprintln!("Job search onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Start date endpoint: {}", config.start_date_url());
    eprintln!("   Fetch emails endpoint: {}", config.fetch_emails_url());

    let user = UserIdentity::resolve(config.user_id.as_deref());
    if user.is_proxy() {
        eprintln!("   User: proxy id {} (no signed-in user)", user.user_id);
    }
    let backend = Arc::new(HttpBackend::new(&config)?);
    let history = Arc::new(History::new(Route::StartDate));

    let deps = ScreenDeps {
        date_store: backend.clone(),
        ingestion: backend,
        navigator: history.clone(),
    };
    let screen = Arc::new(StartDateScreen::new(deps, user));

    if let Some(port) = config.http_port {
        let app = start_date_routes(StartDateRouteState {
            screen: Arc::clone(&screen),
        });
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        eprintln!("   Screen API: http://0.0.0.0:{port}/api/onboarding/start-date");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Screen API server stopped");
            }
        });
    }
    eprintln!();

    let today = chrono::Local::now().date_naive();
    let terminal = TerminalScreen::new(Arc::clone(&screen), today);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    match terminal.run(stdin, tokio::io::stdout()).await? {
        Some(report) => {
            for issue in &report.issues {
                tracing::debug!(issue = %issue, "Onboarding issue");
            }
            let route = history.current().await;
            tracing::info!(route = %route, "Onboarding complete");
        }
        None if screen.state().await.phase == ConfirmationPhase::AwaitingInput => {
            tracing::info!("Onboarding left without confirming");
        }
        None => {
            // Confirmed through the API; let its workflow finish before exiting.
            screen.settled().await;
            let route = history.current().await;
            tracing::info!(route = %route, "Onboarding complete");
        }
    }

    Ok(())
}

//! Terminal front end that drives the start date screen from stdin.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error::{OnboardingError, Result};
use crate::onboarding::view::lookback_hint;
use crate::onboarding::{ConfirmationReport, DatePicker, StartDate, StartDateScreen};

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw text for the date control.
    Date(String),
    Clear,
    Confirm,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" | "confirm" | "ok" => Self::Confirm,
            "clear" => Self::Clear,
            "quit" | "exit" => Self::Quit,
            other => Self::Date(other.to_string()),
        }
    }
}

/// Renders the screen to a writer and feeds it commands read line by line.
pub struct TerminalScreen {
    screen: Arc<StartDateScreen>,
    today: NaiveDate,
}

impl TerminalScreen {
    pub fn new(screen: Arc<StartDateScreen>, today: NaiveDate) -> Self {
        Self { screen, today }
    }

    /// Run until the user confirms, quits, or input ends.
    ///
    /// Returns the confirmation report when the workflow ran.
    pub async fn run<R, W>(&self, input: R, mut out: W) -> Result<Option<ConfirmationReport>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut changes) = mpsc::unbounded_channel::<Option<StartDate>>();
        let mut picker = DatePicker::new(self.screen.state().await.picked, move |date| {
            let _ = tx.send(date);
        });
        let mut lines = input.lines();

        self.print_view(&mut out).await?;

        while let Some(line) = lines.next_line().await? {
            if !self.screen.view().await.is_modal() {
                return self.closed_elsewhere(&mut out).await;
            }

            match Command::parse(&line) {
                Command::Quit => return Ok(None),
                Command::Clear => picker.set(None),
                Command::Date(raw) => {
                    if let Err(e) = picker.input(&raw) {
                        let msg = format!("Not a date (YYYY-MM-DD): {raw} ({e})\n> ");
                        out.write_all(msg.as_bytes()).await?;
                        continue;
                    }
                }
                Command::Confirm => {
                    let confirmation = match self.screen.begin_confirmation().await {
                        Ok(confirmation) => confirmation,
                        Err(OnboardingError::InvalidPhase { .. }) => {
                            return self.closed_elsewhere(&mut out).await;
                        }
                        Err(e) => return Err(e.into()),
                    };
                    self.print_view(&mut out).await?;
                    let report = self.screen.finish_confirmation(confirmation).await?;
                    let msg = format!("Redirecting to {}\n", report.navigated_to);
                    out.write_all(msg.as_bytes()).await?;
                    out.flush().await?;
                    return Ok(Some(report));
                }
            }

            while let Ok(date) = changes.try_recv() {
                if let Err(e) = self.screen.select(date).await {
                    tracing::debug!(error = %e, "Date change arrived after the modal closed");
                    return self.closed_elsewhere(&mut out).await;
                }
            }
            self.print_view(&mut out).await?;
        }

        Ok(None)
    }

    /// The screen was confirmed through another front end. Show the
    /// dashboard and stop reading input.
    async fn closed_elsewhere<W: AsyncWrite + Unpin>(
        &self,
        out: &mut W,
    ) -> Result<Option<ConfirmationReport>> {
        self.print_view(out).await?;
        out.write_all(b"Start date already confirmed.\n").await?;
        out.flush().await?;
        Ok(None)
    }

    async fn print_view<W: AsyncWrite + Unpin>(&self, out: &mut W) -> Result<()> {
        let view = self.screen.view().await;
        let mut text = format!("\n{view}\n");
        if view.is_modal() {
            text.push_str(&lookback_hint(self.today));
            text.push_str("\nEnter a date, 'clear', or press Enter to confirm.\n> ");
        }
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

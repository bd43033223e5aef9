//! Routes and navigation history.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

/// Screens reachable from onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// The start date onboarding screen.
    StartDate,
    /// Email processing progress.
    Processing,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::StartDate => "/start-date",
            Self::Processing => "/processing",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Routing capability handed to screens.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Replace the current history entry, so back-navigation skips it.
    async fn replace(&self, route: Route);
}

/// In-memory history stack.
#[derive(Debug)]
pub struct History {
    entries: RwLock<Vec<Route>>,
}

impl History {
    /// A history whose only entry is `initial`.
    pub fn new(initial: Route) -> Self {
        Self {
            entries: RwLock::new(vec![initial]),
        }
    }

    pub async fn current(&self) -> Route {
        let entries = self.entries.read().await;
        // The stack is never emptied: `back` keeps the first entry.
        entries.last().copied().unwrap_or(Route::StartDate)
    }

    pub async fn push(&self, route: Route) {
        self.entries.write().await.push(route);
    }

    /// Pop the current entry. Returns the new current route, or `None` when
    /// there is nothing to go back to.
    pub async fn back(&self) -> Option<Route> {
        let mut entries = self.entries.write().await;
        if entries.len() <= 1 {
            return None;
        }
        entries.pop();
        entries.last().copied()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn entries(&self) -> Vec<Route> {
        self.entries.read().await.clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::StartDate)
    }
}

#[async_trait]
impl Navigator for History {
    async fn replace(&self, route: Route) {
        let mut entries = self.entries.write().await;
        let from = entries.pop();
        entries.push(route);
        tracing::info!(from = ?from, to = %route, "Replaced history entry");
    }
}

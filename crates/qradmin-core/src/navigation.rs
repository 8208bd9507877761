// ── Navigation sink ──
//
// Controllers never route by themselves; they emit a `Route` and the
// front-end decides what "navigate" means (a page change, a CLI hint).

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Destinations a controller or row action can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The authentication entry point.
    Login,
    Dashboard,
    /// Per-user code listings.
    UserDetail(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "/auth"),
            Self::Dashboard => write!(f, "/dashboard"),
            Self::UserDetail(id) => write!(f, "/dashboard/analytic/{id}"),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every requested route in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Whether a redirect to the login entry point was requested.
    pub fn redirected_to_login(&self) -> bool {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&Route::Login)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

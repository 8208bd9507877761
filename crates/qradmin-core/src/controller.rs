// ── Remote table controller ──
//
// One generic state machine behind every listing. Each fetch is
// all-or-nothing: Idle/Loaded/Failed -> Loading -> Loaded | Failed.
// A missing credential redirects to login and leaves the state Loading.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use qradmin_api::AdminClient;

use crate::auth_gate::AuthGate;
use crate::csv::{self, CsvDocument};
use crate::effects::ClientEffects;
use crate::error::CoreError;
use crate::navigation::{Navigator, Route};
use crate::query::build_filtered;
use crate::view::TableView;

// ── State ────────────────────────────────────────────────────────────

/// Observable lifecycle of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState<R> {
    Idle,
    Loading,
    /// The full row set of the last accepted fetch.
    Loaded(Arc<Vec<R>>),
    Failed(Failure),
}

impl<R> ControllerState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn rows(&self) -> Option<&Arc<Vec<R>>> {
        match self {
            Self::Loaded(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Failure class of a fetch. The controller stays retryable for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be reached.
    Transport,
    /// Non-2xx status other than an auth rejection.
    Http { status: u16 },
    /// 401/403: the credential was refused.
    Unauthorized { status: u16 },
    /// 2xx with a body that lacks the expected row array.
    Schema,
}

impl FailureKind {
    /// Unreachable service or a 5xx: a refresh may succeed.
    pub fn is_transient(self) -> bool {
        match self {
            Self::Transport => true,
            Self::Http { status } => status >= 500,
            Self::Unauthorized { .. } | Self::Schema => false,
        }
    }
}

/// A user-visible, dismissible fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    fn from_error(err: &CoreError) -> Self {
        let kind = match err {
            CoreError::Unauthorized { status, .. } => FailureKind::Unauthorized { status: *status },
            CoreError::Http { status, .. } => FailureKind::Http { status: *status },
            CoreError::Schema { .. } => FailureKind::Schema,
            _ => FailureKind::Transport,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// How overlapping fetches on one controller are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyPolicy {
    /// Responses from anything but the newest fetch are discarded.
    #[default]
    LatestRequestWins,
    /// Whichever response resolves last overwrites the state.
    LastResolvedWins,
}

/// What a single `fetch` did, so callers can react without reading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows replaced; carries the row count.
    Loaded(usize),
    Failed(Failure),
    /// No credential; navigation to login was requested and nothing was sent.
    Redirected,
    /// A newer fetch was issued before this one resolved; its result was dropped.
    Superseded,
}

// ── Collaborators ────────────────────────────────────────────────────

/// Everything a controller needs besides its view.
#[derive(Clone)]
pub struct Collaborators {
    pub client: AdminClient,
    pub gate: Arc<dyn AuthGate>,
    pub navigator: Arc<dyn Navigator>,
    pub policy: ConsistencyPolicy,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("base_url", &self.client.base_url().as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Authenticated remote-table controller, generic over its [`TableView`].
///
/// Cheaply cloneable; clones share state, filter and request generation.
pub struct RemoteTableController<V: TableView> {
    inner: Arc<Inner<V>>,
}

impl<V: TableView> Clone for RemoteTableController<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<V: TableView> {
    view: V,
    deps: Collaborators,
    filter: watch::Sender<V::Filter>,
    state: watch::Sender<ControllerState<V::Row>>,
    /// Id of the most recently issued fetch.
    generation: AtomicU64,
}

impl<V: TableView> RemoteTableController<V> {
    /// Create a controller in `Idle` with the default (`all`) filter.
    /// Nothing is fetched until [`fetch`](Self::fetch) is called.
    pub fn new(view: V, deps: Collaborators) -> Self {
        let (filter, _) = watch::channel(V::Filter::default());
        let (state, _) = watch::channel(ControllerState::Idle);
        Self {
            inner: Arc::new(Inner {
                view,
                deps,
                filter,
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    pub fn policy(&self) -> ConsistencyPolicy {
        self.inner.deps.policy
    }

    /// Current state snapshot.
    pub fn state(&self) -> ControllerState<V::Row> {
        self.inner.state.borrow().clone()
    }

    /// Watch every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState<V::Row>> {
        self.inner.state.subscribe()
    }

    pub fn filter(&self) -> V::Filter {
        *self.inner.filter.borrow()
    }

    /// The loaded row set, if the controller is `Loaded`.
    pub fn rows(&self) -> Option<Arc<Vec<V::Row>>> {
        self.inner.state.borrow().rows().cloned()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Run one fetch against the current filter.
    pub async fn fetch(&self) -> FetchOutcome {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.state.send_replace(ControllerState::Loading);

        let Some(credential) = inner.deps.gate.credential() else {
            info!(view = V::TITLE, "no stored credential, redirecting to login");
            inner.deps.navigator.navigate(Route::Login);
            return FetchOutcome::Redirected;
        };

        let filter = *inner.filter.borrow();
        let result = match inner.view.resource(&inner.deps.client) {
            Ok(resource) => {
                let url = build_filtered(&resource, filter);
                debug!(view = V::TITLE, %url, generation, "fetch dispatched");
                inner
                    .deps
                    .client
                    .fetch_collection::<V::Row>(url, credential.token(), V::ENVELOPE)
                    .await
                    .map_err(CoreError::from)
            }
            Err(e) => Err(e),
        };

        if inner.deps.policy == ConsistencyPolicy::LatestRequestWins
            && inner.generation.load(Ordering::SeqCst) != generation
        {
            debug!(view = V::TITLE, generation, "stale response discarded");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(rows) => {
                let count = rows.len();
                info!(view = V::TITLE, %filter, count, "rows loaded");
                inner
                    .state
                    .send_replace(ControllerState::Loaded(Arc::new(rows)));
                FetchOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(view = V::TITLE, %filter, error = %e, "fetch failed");
                let failure = Failure::from_error(&e);
                inner
                    .state
                    .send_replace(ControllerState::Failed(failure.clone()));
                FetchOutcome::Failed(failure)
            }
        }
    }

    /// Drop any failure and fetch again. Safe to call while a fetch is in
    /// flight; the policy decides which response is kept.
    pub async fn refresh(&self) -> FetchOutcome {
        if let Some(failure) = self.inner.state.borrow().failure() {
            debug!(view = V::TITLE, message = %failure.message, "retrying after failure");
        }
        self.fetch().await
    }

    /// Select a new filter and fetch once. Re-selecting the current value
    /// is a no-op and returns `None`.
    pub async fn on_filter_change(&self, filter: V::Filter) -> Option<FetchOutcome> {
        let changed = self.inner.filter.send_if_modified(|current| {
            if *current == filter {
                false
            } else {
                *current = filter;
                true
            }
        });
        if !changed {
            debug!(view = V::TITLE, %filter, "filter unchanged");
            return None;
        }
        Some(self.fetch().await)
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Render the loaded rows as CSV. `None` when nothing is loaded or the
    /// row set is empty.
    pub fn export_document(&self) -> Option<CsvDocument> {
        let rows = self.rows()?;
        csv::export(&rows, &self.inner.view.columns(), V::EXPORT_FILE)
    }

    /// Export the loaded rows through `effects`. Returns the saved path, or
    /// `None` when no file was produced.
    pub fn export_csv(&self, effects: &dyn ClientEffects) -> Result<Option<PathBuf>, CoreError> {
        let Some(doc) = self.export_document() else {
            debug!(view = V::TITLE, "nothing to export");
            return Ok(None);
        };
        let path = effects.save_file(&doc.file_name, doc.body.as_bytes())?;
        info!(view = V::TITLE, path = %path.display(), "CSV exported");
        Ok(Some(path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth_gate::StaticGate;
    use crate::filter::FilterValue;
    use crate::navigation::RecordingNavigator;
    use crate::view::UsersView;
    use qradmin_api::TransportConfig;

    fn controller(gate: StaticGate, nav: Arc<RecordingNavigator>) -> RemoteTableController<UsersView> {
        let deps = Collaborators {
            client: AdminClient::new("http://127.0.0.1:9", &TransportConfig::default()).unwrap(),
            gate: Arc::new(gate),
            navigator: nav,
            policy: ConsistencyPolicy::default(),
        };
        RemoteTableController::new(UsersView, deps)
    }

    #[test]
    fn starts_idle_with_default_filter() {
        let ctl = controller(StaticGate::empty(), Arc::new(RecordingNavigator::new()));
        assert_eq!(ctl.state(), ControllerState::Idle);
        assert!(ctl.filter().is_all());
        assert!(ctl.export_document().is_none());
    }

    #[tokio::test]
    async fn missing_credential_redirects_and_stays_loading() {
        let nav = Arc::new(RecordingNavigator::new());
        let ctl = controller(StaticGate::empty(), Arc::clone(&nav));

        assert_eq!(ctl.fetch().await, FetchOutcome::Redirected);
        assert!(ctl.state().is_loading());
        assert_eq!(nav.history(), vec![Route::Login]);
    }

    #[test]
    fn failure_kinds_follow_error_class() {
        let f = Failure::from_error(&CoreError::Http {
            status: 500,
            message: "HTTP error: status 500".into(),
        });
        assert_eq!(f.kind, FailureKind::Http { status: 500 });

        let f = Failure::from_error(&CoreError::Schema {
            detail: "missing data".into(),
        });
        assert_eq!(f.kind, FailureKind::Schema);
        assert_eq!(f.message, "Invalid data format received");
    }

    #[test]
    fn only_outages_and_server_errors_are_transient() {
        assert!(FailureKind::Transport.is_transient());
        assert!(FailureKind::Http { status: 503 }.is_transient());
        assert!(!FailureKind::Http { status: 404 }.is_transient());
        assert!(!FailureKind::Unauthorized { status: 401 }.is_transient());
        assert!(!FailureKind::Schema.is_transient());
    }
}

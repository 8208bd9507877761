//! Remote-table controllers between `qradmin-api` and front-ends.
//!
//! Every listing of the admin console (users, a user's text/link codes, a
//! user's file codes) is the same machine with different parameters:
//!
//! - **[`AuthGate`]** resolves the stored [`Credential`]. Absent means the
//!   operation is abandoned and [`Route::Login`] is sent to the
//!   [`Navigator`].
//! - **[`query`]** turns a filter selection into the fetch URL (bare resource
//!   for `all`, otherwise a single `contentType` parameter).
//! - **[`RemoteTableController`]** owns the `Idle -> Loading -> Loaded |
//!   Failed` lifecycle, exposed through a `watch` channel, and reacts to
//!   filter changes and retries. A request generation counter keeps stale
//!   responses from overwriting newer ones unless
//!   [`ConsistencyPolicy::LastResolvedWins`] is selected.
//! - **[`RowActionDispatcher`]** classifies row values ([`classify`]) and
//!   downloads documents, opens links, or navigates to a user's detail view
//!   through injected [`ClientEffects`].
//! - **[`csv`]** serializes the loaded rows with one quoting rule for every
//!   remote value.
//! - **[`paging`]** slices the loaded rows for display.
//!
//! [`AdminConsole`] wires all of it to a single [`ConsoleConfig`].

pub mod actions;
pub mod auth_gate;
pub mod config;
pub mod console;
pub mod controller;
pub mod csv;
pub mod effects;
pub mod error;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod paging;
pub mod query;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actions::{ActionOutcome, ContentClass, RowActionDispatcher, classify, filename_from_url};
pub use auth_gate::{AuthGate, CREDENTIAL_TTL_DAYS, Credential, StaticGate};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{AdminConsole, validate_credentials};
pub use controller::{
    Collaborators, ConsistencyPolicy, ControllerState, Failure, FailureKind, FetchOutcome,
    RemoteTableController,
};
pub use csv::CsvDocument;
pub use effects::{ClientEffects, DiskEffects, MemoryEffects};
pub use error::CoreError;
pub use filter::{FileFilter, FilterValue, TextFilter, Unfiltered};
pub use model::{Row, format_date};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use paging::{PAGE_SIZES, Page};
pub use view::{FileCodesView, TableView, TextCodesView, UsersView};

// Wire records, re-exported so front-ends need only this crate.
pub use qradmin_api::{AdminProfile, AssetRef, FileCodeRecord, TextCodeRecord, UserRecord};

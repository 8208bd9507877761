//! Command handlers, one module per top-level command group.

pub mod actions;
pub mod auth;
pub mod codes;
pub mod config_cmd;
pub mod users;
pub mod util;

use std::path::PathBuf;
use std::sync::Arc;

use qradmin_config::SessionStore;
use qradmin_core::{AdminConsole, AuthGate, RecordingNavigator, StaticGate};

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// A console bound to the resolved profile.
///
/// The gate is the profile's session store unless `--token` supplies a
/// one-off credential. Navigation requests are recorded and interpreted by
/// the handlers after each operation.
pub struct Context {
    pub console: AdminConsole,
    pub store: SessionStore,
    pub navigator: Arc<RecordingNavigator>,
    pub profile_name: String,
    pub download_dir: PathBuf,
}

impl Context {
    pub fn new(resolved: Resolved, global: &GlobalOpts) -> Result<Self, CliError> {
        let navigator = Arc::new(RecordingNavigator::new());
        let gate: Arc<dyn AuthGate> = match global.token {
            Some(ref token) => Arc::new(StaticGate::with_token(token.clone())),
            None => Arc::new(resolved.store.clone()),
        };
        let console = AdminConsole::new(&resolved.console, gate, navigator.clone())?;

        Ok(Self {
            console,
            store: resolved.store,
            navigator,
            profile_name: resolved.profile_name,
            download_dir: resolved.download_dir,
        })
    }
}

/// Dispatch a service-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(args, ctx, global).await,
        Command::Register(args) => auth::register(args, ctx, global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Whoami => auth::whoami(ctx, global).await,
        Command::Users(args) => users::handle(args, ctx, global).await,
        Command::Codes(args) => codes::handle(args, ctx, global).await,
        Command::Download { url } => actions::download(&url, ctx, global).await,
        Command::Open(args) => actions::open(args, ctx, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Config {
            message: "command does not need a service connection".into(),
        }),
    }
}

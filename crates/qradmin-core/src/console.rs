// ── Console facade ──
//
// Wires one admin client, credential gate and navigation sink into the
// per-listing controllers, the row-action dispatcher and the account
// operations (sign in, register, profile, sign out).

use std::sync::{Arc, LazyLock};

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use qradmin_api::{AdminClient, AdminProfile};

use crate::actions::RowActionDispatcher;
use crate::auth_gate::{AuthGate, Credential};
use crate::config::ConsoleConfig;
use crate::controller::{Collaborators, RemoteTableController};
use crate::effects::ClientEffects;
use crate::error::CoreError;
use crate::navigation::{Navigator, Route};
use crate::view::{FileCodesView, TextCodesView, UsersView};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok());

/// Check sign-in/registration input before anything is sent.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CoreError> {
    let invalid = |message: &str| CoreError::ValidationFailed {
        message: message.to_owned(),
    };

    if email.is_empty() || password.is_empty() {
        return Err(invalid("All fields are required"));
    }
    let shaped = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email));
    if !shaped {
        return Err(invalid("Invalid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters"));
    }
    Ok(())
}

/// Entry point for front-ends.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    deps: Collaborators,
}

impl AdminConsole {
    pub fn new(
        config: &ConsoleConfig,
        gate: Arc<dyn AuthGate>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            deps: Collaborators {
                client: config.build_client()?,
                gate,
                navigator,
                policy: config.consistency,
            },
        })
    }

    pub fn from_parts(deps: Collaborators) -> Self {
        Self { deps }
    }

    pub fn client(&self) -> &AdminClient {
        &self.deps.client
    }

    pub fn gate(&self) -> &Arc<dyn AuthGate> {
        &self.deps.gate
    }

    // ── Listings ─────────────────────────────────────────────────────

    pub fn users(&self) -> RemoteTableController<UsersView> {
        RemoteTableController::new(UsersView, self.deps.clone())
    }

    pub fn text_codes(&self, owner: impl Into<String>) -> RemoteTableController<TextCodesView> {
        RemoteTableController::new(TextCodesView::new(owner), self.deps.clone())
    }

    pub fn file_codes(&self, owner: impl Into<String>) -> RemoteTableController<FileCodesView> {
        RemoteTableController::new(FileCodesView::new(owner), self.deps.clone())
    }

    pub fn dispatcher(&self, effects: Arc<dyn ClientEffects>) -> RowActionDispatcher {
        RowActionDispatcher::new(
            self.deps.client.clone(),
            effects,
            Arc::clone(&self.deps.navigator),
        )
    }

    // ── Account ──────────────────────────────────────────────────────

    /// Sign in and issue a fresh seven-day credential. Storing it is the
    /// caller's job.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Credential, CoreError> {
        validate_credentials(email, password.expose_secret())?;
        let token = self.deps.client.login(email, password).await?;
        let credential = Credential::issue(token);
        info!(%email, expires_at = %credential.expires_at, "signed in");
        self.deps.navigator.navigate(Route::Dashboard);
        Ok(credential)
    }

    pub async fn register(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        validate_credentials(email, password.expose_secret())?;
        self.deps.client.register(email, password).await?;
        info!(%email, "admin account registered");
        Ok(())
    }

    /// The signed-in operator's profile. Without a credential this
    /// redirects to login and fails with [`CoreError::AuthMissing`].
    pub async fn profile(&self) -> Result<AdminProfile, CoreError> {
        let Some(credential) = self.deps.gate.credential() else {
            self.deps.navigator.navigate(Route::Login);
            return Err(CoreError::AuthMissing);
        };
        Ok(self.deps.client.profile(credential.token()).await?)
    }

    /// Forget the stored credential and return to the login entry point.
    pub fn logout(&self) {
        self.deps.gate.clear_credential();
        self.deps.navigator.navigate(Route::Login);
        info!("signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), CoreError>) -> String {
        match result {
            Err(CoreError::ValidationFailed { message }) => message,
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn all_fields_required() {
        assert_eq!(message(validate_credentials("", "secret1")), "All fields are required");
        assert_eq!(message(validate_credentials("a@b.co", "")), "All fields are required");
    }

    #[test]
    fn email_must_look_like_an_address() {
        assert_eq!(message(validate_credentials("nobody", "secret1")), "Invalid email");
        assert_eq!(message(validate_credentials("a@b.c", "secret1")), "Invalid email");
        assert!(validate_credentials("Ops.Team+qr@Example.COM", "secret1").is_ok());
    }

    #[test]
    fn password_needs_six_characters() {
        assert_eq!(
            message(validate_credentials("a@b.co", "12345")),
            "Password must be at least 6 characters"
        );
        assert!(validate_credentials("a@b.co", "123456").is_ok());
    }
}

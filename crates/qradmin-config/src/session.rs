// ── Persisted admin sessions ──
//
// The issued credential survives between invocations in a per-profile JSON
// file or in the OS keyring. Both stores answer the `AuthGate` contract and
// treat an entry past its expiry as absent, deleting it on read.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qradmin_core::{AuthGate, Credential};

use crate::{ConfigError, Profile, session_dir};

const KEYRING_SERVICE: &str = "qradmin";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl StoredSession {
    fn from_credential(credential: &Credential) -> Self {
        Self {
            token: credential.token().expose_secret().to_owned(),
            issued_at: credential.issued_at,
            expires_at: credential.expires_at,
        }
    }

    fn into_credential(self) -> Credential {
        Credential::restore(SecretString::from(self.token), self.issued_at, self.expires_at)
    }
}

/// Drop credentials whose storage horizon has passed.
fn live(credential: Credential) -> Option<Credential> {
    (!credential.is_expired_at(Utc::now())).then_some(credential)
}

// ── File store ──────────────────────────────────────────────────────

/// Session stored as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The session file for `profile` under the platform data directory.
    pub fn for_profile(profile: &str) -> Self {
        Self::new(session_dir().join(format!("{profile}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn session_error(&self, reason: impl std::fmt::Display) -> ConfigError {
        ConfigError::Session {
            location: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Read the stored credential, expired or not.
    pub fn load(&self) -> Result<Option<Credential>, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession =
            serde_json::from_str(&raw).map_err(|e| self.session_error(e))?;
        Ok(Some(stored.into_credential()))
    }

    /// Write the credential atomically. The staged file is created owner-only
    /// (0600 on unix) and renamed into place, so the token is never readable
    /// by others.
    pub fn persist(&self, credential: &Credential) -> Result<(), ConfigError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(&StoredSession::from_credential(credential))
            .map_err(|e| self.session_error(e))?;

        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(json.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&self.path)
            .map_err(|e| self.session_error(e.error))?;
        debug!(path = %self.path.display(), "session stored");
        Ok(())
    }

    pub fn remove(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl AuthGate for SessionFile {
    fn credential(&self) -> Option<Credential> {
        let stored = match self.load() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "unreadable session ignored");
                return None;
            }
        };
        let credential = live(stored);
        if credential.is_none() {
            debug!(path = %self.path.display(), "stored session expired");
            AuthGate::clear_credential(self);
        }
        credential
    }

    fn clear_credential(&self) {
        if let Err(e) = self.remove() {
            warn!(error = %e, "failed to remove session file");
        }
    }
}

// ── Keyring store ───────────────────────────────────────────────────

/// Session stored as a JSON secret in the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringSession {
    account: String,
}

impl KeyringSession {
    pub fn for_profile(profile: &str) -> Self {
        Self {
            account: format!("{profile}/session"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, ConfigError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| ConfigError::Keyring(e.to_string()))
    }

    pub fn load(&self) -> Result<Option<Credential>, ConfigError> {
        let secret = match self.entry()?.get_password() {
            Ok(secret) => secret,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(ConfigError::Keyring(e.to_string())),
        };
        let stored: StoredSession =
            serde_json::from_str(&secret).map_err(|e| ConfigError::Session {
                location: format!("keyring:{}", self.account),
                reason: e.to_string(),
            })?;
        Ok(Some(stored.into_credential()))
    }

    pub fn persist(&self, credential: &Credential) -> Result<(), ConfigError> {
        let json = serde_json::to_string(&StoredSession::from_credential(credential)).map_err(
            |e| ConfigError::Session {
                location: format!("keyring:{}", self.account),
                reason: e.to_string(),
            },
        )?;
        self.entry()?
            .set_password(&json)
            .map_err(|e| ConfigError::Keyring(e.to_string()))?;
        debug!(account = %self.account, "session stored in keyring");
        Ok(())
    }

    pub fn remove(&self) -> Result<(), ConfigError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ConfigError::Keyring(e.to_string())),
        }
    }
}

impl AuthGate for KeyringSession {
    fn credential(&self) -> Option<Credential> {
        let stored = match self.load() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "keyring session unavailable");
                return None;
            }
        };
        let credential = live(stored);
        if credential.is_none() {
            AuthGate::clear_credential(self);
        }
        credential
    }

    fn clear_credential(&self) {
        if let Err(e) = self.remove() {
            warn!(error = %e, "failed to remove keyring session");
        }
    }
}

// ── Selection ───────────────────────────────────────────────────────

/// The credential store a profile selects.
#[derive(Debug, Clone)]
pub enum SessionStore {
    File(SessionFile),
    Keyring(KeyringSession),
}

impl SessionStore {
    /// Pick the store named by `profile.credential_store`.
    pub fn for_profile(profile: &Profile, name: &str) -> Result<Self, ConfigError> {
        match profile.credential_store.as_str() {
            "file" => Ok(Self::File(SessionFile::for_profile(name))),
            "keyring" => Ok(Self::Keyring(KeyringSession::for_profile(name))),
            other => Err(ConfigError::Validation {
                field: "credential_store".into(),
                reason: format!("expected 'file' or 'keyring', got '{other}'"),
            }),
        }
    }

    pub fn persist(&self, credential: &Credential) -> Result<(), ConfigError> {
        match self {
            Self::File(store) => store.persist(credential),
            Self::Keyring(store) => store.persist(credential),
        }
    }

    /// Human-readable location, for status output.
    pub fn describe(&self) -> String {
        match self {
            Self::File(store) => store.path().display().to_string(),
            Self::Keyring(store) => format!("keyring ({KEYRING_SERVICE}/{})", store.account),
        }
    }
}

impl AuthGate for SessionStore {
    fn credential(&self) -> Option<Credential> {
        match self {
            Self::File(store) => store.credential(),
            Self::Keyring(store) => store.credential(),
        }
    }

    fn clear_credential(&self) {
        match self {
            Self::File(store) => store.clear_credential(),
            Self::Keyring(store) => store.clear_credential(),
        }
    }
}

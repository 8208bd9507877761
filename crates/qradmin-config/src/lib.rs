//! Shared configuration for the qradmin CLI.
//!
//! TOML profiles merged with `QRADMIN_*` environment overrides, platform
//! config/data paths, persisted admin sessions ([`session`]), and
//! translation to `qradmin_core::ConsoleConfig`. The CLI adds its
//! flag-aware wrappers on top.

pub mod session;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qradmin_core::{ConsistencyPolicy, ConsoleConfig, TlsVerification};

pub use session::{KeyringSession, SessionFile, SessionStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("session storage at {location}: {reason}")]
    Session { location: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

/// Name of the profile used when nothing else is selected.
pub const DEFAULT_PROFILE: &str = "default";

/// Service URL assumed when no profile or flag provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named admin service profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://localhost:3001").
    pub api_url: String,

    /// Where the session token lives: "file" or "keyring".
    #[serde(default = "default_credential_store")]
    pub credential_store: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Directory for downloads and CSV exports (default: current directory).
    pub download_dir: Option<PathBuf>,

    /// Overlapping fetch policy: "latest-request" or "last-resolved".
    pub consistency: Option<String>,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            credential_store: default_credential_store(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            download_dir: None,
            consistency: None,
        }
    }
}

fn default_credential_store() -> String {
    "file".into()
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "qradmin", "qradmin")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for part in parts {
        p.push(part);
    }
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "qradmin", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding one session file per profile.
pub fn session_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "qradmin", "sessions"]),
        |dirs| dirs.data_dir().join("sessions"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still honouring `QRADMIN_*` overrides.
///
/// Nested keys use a double underscore, e.g. `QRADMIN_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("QRADMIN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only the config file, without environment overrides.
///
/// Used before rewriting the file so that overrides never get persisted.
/// A missing file yields the defaults; a file that fails to parse is an
/// error, never silently replaced.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a consistency policy name.
pub fn parse_consistency(raw: &str) -> Result<ConsistencyPolicy, ConfigError> {
    match raw {
        "latest-request" => Ok(ConsistencyPolicy::LatestRequestWins),
        "last-resolved" => Ok(ConsistencyPolicy::LastResolvedWins),
        other => Err(ConfigError::Validation {
            field: "consistency".into(),
            reason: format!("expected 'latest-request' or 'last-resolved', got '{other}'"),
        }),
    }
}

/// Build a `ConsoleConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let consistency = profile
        .consistency
        .as_deref()
        .map(parse_consistency)
        .transpose()?
        .unwrap_or_default();

    Ok(ConsoleConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        consistency,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.active_profile_name(), "default");
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ntimeout = \"soon\"\n\n[profiles.prod]\napi_url = \"https://qr.example.com\"\n",
        )
        .unwrap();

        assert!(matches!(load_config_file(&path), Err(ConfigError::Figment(_))));
        assert!(load_config_from(&path).is_err());

        let absent = load_config_file(&dir.path().join("absent.toml")).unwrap();
        assert!(absent.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("https://qr.example.com/api");
        profile.credential_store = "keyring".into();
        profile.timeout = Some(5);
        cfg.profiles.insert("prod".into(), profile);
        cfg.default_profile = Some("prod".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let prod = loaded.profile("prod").unwrap();
        assert_eq!(prod.api_url, "https://qr.example.com/api");
        assert_eq!(prod.credential_store, "keyring");
        assert_eq!(loaded.active_profile_name(), "prod");
        assert!(matches!(
            loaded.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_translates_tls_and_timeout() {
        let defaults = Defaults::default();
        let mut profile = Profile::new("http://localhost:3001");

        let cfg = profile_to_console_config(&profile, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.timeout, Duration::from_secs(30));

        profile.ca_cert = Some(PathBuf::from("/etc/qr-ca.pem"));
        profile.timeout = Some(3);
        let cfg = profile_to_console_config(&profile, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::CustomCa(PathBuf::from("/etc/qr-ca.pem")));
        assert_eq!(cfg.timeout, Duration::from_secs(3));

        profile.insecure = Some(true);
        let cfg = profile_to_console_config(&profile, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_profile_values_are_rejected() {
        let defaults = Defaults::default();
        let bad_url = Profile::new("not a url");
        assert!(profile_to_console_config(&bad_url, &defaults).is_err());

        let mut bad_policy = Profile::new("http://localhost:3001");
        bad_policy.consistency = Some("random".into());
        assert!(profile_to_console_config(&bad_policy, &defaults).is_err());

        bad_policy.consistency = Some("last-resolved".into());
        let cfg = profile_to_console_config(&bad_policy, &defaults).unwrap();
        assert_eq!(cfg.consistency, ConsistencyPolicy::LastResolvedWins);
    }
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError`, and controller failures into user-facing
//! errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use qradmin_config::ConfigError;
use qradmin_core::{CoreError, Failure, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the admin service at {url}")]
    #[diagnostic(
        code(qradmin::connection_failed),
        help(
            "Check that the service is running and the URL is right.\n\
             Reason: {reason}\n\
             Override with --api-url or `qradmin config set api_url <url>`."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("{message}")]
    #[diagnostic(
        code(qradmin::unreachable),
        help("Check that the service is running. Retry with --retry N.")
    )]
    Unreachable { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(qradmin::not_signed_in),
        help("Run: qradmin login\nOr pass a token with --token / QRADMIN_TOKEN.")
    )]
    NotSignedIn,

    #[error("The service rejected the session ({status}): {message}")]
    #[diagnostic(
        code(qradmin::auth_rejected),
        help("The session may have been revoked. Run: qradmin login")
    )]
    AuthRejected { status: u16, message: String },

    #[error("Sign-in failed: {message}")]
    #[diagnostic(code(qradmin::login_failed))]
    LoginFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(qradmin::api_error))]
    ApiError { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(qradmin::invalid_response),
        help("The service answered with an unexpected payload. Re-run with -vv for details.")
    )]
    InvalidResponse { message: String },

    // ── Row actions ──────────────────────────────────────────────────
    #[error("Failed to download file. Please try again.")]
    #[diagnostic(code(qradmin::download_failed), help("{url}: {reason}"))]
    DownloadFailed { url: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(qradmin::effect))]
    Effect { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qradmin::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(qradmin::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: qradmin config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(qradmin::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(qradmin::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(qradmin::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::NotSignedIn | Self::AuthRejected { .. } | Self::LoginFailed { .. } => {
                exit_code::AUTH
            }
            Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthMissing => CliError::NotSignedIn,
            CoreError::Unauthorized { status, message } => {
                CliError::AuthRejected { status, message }
            }
            CoreError::AuthenticationFailed { message } => CliError::LoginFailed { message },
            CoreError::Transport { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Http { status, message } => CliError::ApiError { status, message },
            err @ CoreError::Schema { .. } => CliError::InvalidResponse {
                message: err.to_string(),
            },
            CoreError::Download { url, reason } => CliError::DownloadFailed { url, reason },
            CoreError::Effect { message } => CliError::Effect { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "credentials".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::from("(none)"),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

// ── Controller failure → CliError mapping ────────────────────────────

impl From<Failure> for CliError {
    fn from(failure: Failure) -> Self {
        match failure.kind {
            FailureKind::Unauthorized { status } => CliError::AuthRejected {
                status,
                message: failure.message,
            },
            FailureKind::Http { status } => CliError::ApiError {
                status,
                message: failure.message,
            },
            FailureKind::Schema => CliError::InvalidResponse {
                message: failure.message,
            },
            FailureKind::Transport => CliError::Unreachable {
                message: failure.message,
            },
        }
    }
}

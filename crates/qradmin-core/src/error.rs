// ── Core error types ──
//
// User-facing errors from qradmin-core. The `From<qradmin_api::Error>` impl
// buckets transport-layer failures into the controller's taxonomy:
// missing credential, transport, HTTP status, payload shape, and scoped
// row-action failures.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// No stored credential. Callers redirect to login instead of
    /// surfacing this inline.
    #[error("Not signed in")]
    AuthMissing,

    /// The service rejected the credential (401/403).
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Fetch failures ───────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Invalid data format received")]
    Schema { detail: String },

    // ── Row actions ──────────────────────────────────────────────────
    #[error("Failed to download file. Please try again. ({url}: {reason})")]
    Download { url: String, reason: String },

    #[error("Local effect failed: {message}")]
    Effect { message: String },

    // ── Input / configuration ────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status behind this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qradmin_api::Error> for CoreError {
    fn from(err: qradmin_api::Error) -> Self {
        if err.is_auth_rejected() {
            return CoreError::Unauthorized {
                status: err.status().unwrap_or(401),
                message: err.to_string(),
            };
        }

        match err {
            qradmin_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            qradmin_api::Error::InvalidToken(reason) => CoreError::AuthenticationFailed {
                message: format!("stored token is unusable: {reason}"),
            },
            qradmin_api::Error::Transport(ref e) => CoreError::Transport {
                url: e
                    .url()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "<unknown>".into()),
                reason: e.to_string(),
            },
            qradmin_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            qradmin_api::Error::Tls(reason) => CoreError::Transport {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            qradmin_api::Error::Http { status, message } => CoreError::Http {
                status,
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("HTTP error: status {status}")),
            },
            qradmin_api::Error::Schema { detail, body: _ } => CoreError::Schema { detail },
            qradmin_api::Error::Asset { url, status } => CoreError::Download {
                url,
                reason: format!("HTTP {status}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_generic_message() {
        let err: CoreError = qradmin_api::Error::Http {
            status: 500,
            message: None,
        }
        .into();
        assert!(matches!(err, CoreError::Http { status: 500, .. }));
        assert_eq!(err.to_string(), "HTTP error: status 500");
    }

    #[test]
    fn forbidden_is_bucketed_as_unauthorized() {
        let err: CoreError = qradmin_api::Error::Http {
            status: 403,
            message: Some("Access denied".into()),
        }
        .into();
        assert!(matches!(err, CoreError::Unauthorized { status: 403, .. }));
        assert_eq!(err.to_string(), "Access denied");
    }

    #[test]
    fn schema_error_reads_as_invalid_format() {
        let err: CoreError = qradmin_api::Error::Schema {
            detail: "missing `data` field".into(),
            body: "{}".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid data format received");
    }
}

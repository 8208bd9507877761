use thiserror::Error;

/// Top-level error type for the `qradmin-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, HTTP status and payload shape. `qradmin-core` maps these
/// into the controller's failure taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or registration rejected by the service.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The stored token cannot be carried in an HTTP header.
    #[error("Invalid admin token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response ────────────────────────────────────────────────────
    /// Non-2xx status. `message` is the server-supplied `message` field,
    /// when the body carried one.
    #[error("{}", http_message(.status, .message))]
    Http {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose body lacks the expected array (or object) field.
    #[error("Invalid data format received")]
    Schema { detail: String, body: String },

    // ── Assets ──────────────────────────────────────────────────────
    /// Anonymous asset download returned a non-2xx status.
    #[error("Asset download failed (HTTP {status}): {url}")]
    Asset { url: String, status: u16 },
}

fn http_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => msg.clone(),
        _ => format!("HTTP error: status {status}"),
    }
}

impl Error {
    /// Returns `true` if the service rejected the admin token
    /// (401 or 403). Expired tokens only ever surface this way.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Asset { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_without_server_message_names_status() {
        let err = Error::Http {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP error: status 500");
    }

    #[test]
    fn http_error_prefers_server_message() {
        let err = Error::Http {
            status: 404,
            message: Some("User not found".into()),
        };
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn empty_server_message_falls_back_to_status() {
        let err = Error::Http {
            status: 502,
            message: Some(String::new()),
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn auth_rejection_is_status_bucketed() {
        for status in [401, 403] {
            let err = Error::Http {
                status,
                message: None,
            };
            assert!(err.is_auth_rejected());
        }
        let err = Error::Http {
            status: 400,
            message: None,
        };
        assert!(!err.is_auth_rejected());
    }
}

// ── Runtime console configuration ──
//
// Describes *how* to reach the admin service. Never touches disk: the CLI
// resolves a profile and hands a `ConsoleConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use qradmin_api::{AdminClient, TlsMode, TransportConfig};

use crate::controller::ConsistencyPolicy;
use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Connection settings for one admin service.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Service base URL (e.g. `http://localhost:3001/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Reconciliation of overlapping fetches.
    pub consistency: ConsistencyPolicy,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            consistency: ConsistencyPolicy::default(),
        }
    }

    /// Build the HTTP client these settings describe.
    pub fn build_client(&self) -> Result<AdminClient, CoreError> {
        let transport = TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        };
        AdminClient::new(self.api_url.as_str(), &transport).map_err(|e| CoreError::Config {
            message: format!("cannot build client for {}: {e}", self.api_url),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_latest_wins() {
        let cfg = ConsoleConfig::new(Url::parse("http://localhost:3001/api").unwrap());
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.consistency, ConsistencyPolicy::LatestRequestWins);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn client_base_url_keeps_path() {
        let cfg = ConsoleConfig::new(Url::parse("http://localhost:3001/api").unwrap());
        let client = cfg.build_client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/api/");
    }
}

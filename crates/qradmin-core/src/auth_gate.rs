// ── Credential gate ──
//
// Every controller operation starts by resolving the stored admin token.
// The gate only reads and clears; issuing happens at login, outside the
// controllers. Expiry is never checked here: an expired token surfaces
// as a 401/403 from the service.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

/// Lifetime of a freshly issued credential.
pub const CREDENTIAL_TTL_DAYS: i64 = 7;

/// Opaque bearer token plus its issuance window.
#[derive(Debug, Clone)]
pub struct Credential {
    token: SecretString,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Issue a credential now, expiring after [`CREDENTIAL_TTL_DAYS`].
    pub fn issue(token: SecretString) -> Self {
        Self::issue_at(token, Utc::now())
    }

    pub fn issue_at(token: SecretString, issued_at: DateTime<Utc>) -> Self {
        Self {
            token,
            issued_at,
            expires_at: issued_at + Duration::days(CREDENTIAL_TTL_DAYS),
        }
    }

    /// Rebuild a credential read back from storage.
    pub fn restore(
        token: SecretString,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            issued_at,
            expires_at,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Whether the storage horizon has passed. Stores use this to drop
    /// stale entries; the gate contract itself never consults it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Read/clear access to the operator's stored credential.
///
/// Injected into every controller; shared, never mutated by them.
pub trait AuthGate: Send + Sync {
    /// The stored credential, or `None` when the operator must sign in.
    fn credential(&self) -> Option<Credential>;

    /// Forget the stored credential (logout).
    fn clear_credential(&self);
}

/// In-memory gate, used for `--token` overrides and tests.
#[derive(Debug, Default)]
pub struct StaticGate {
    slot: RwLock<Option<Credential>>,
}

impl StaticGate {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            slot: RwLock::new(credential),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(Credential::issue(SecretString::from(token.into()))))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, credential: Credential) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }
}

impl AuthGate for StaticGate {
    fn credential(&self) -> Option<Credential> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_credential(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use secrecy::ExposeSecret;

    #[test]
    fn issued_credential_expires_after_seven_days() {
        let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single();
        let Some(issued) = issued else {
            panic!("valid timestamp");
        };
        let cred = Credential::issue_at(SecretString::from("t".to_string()), issued);

        assert_eq!(cred.expires_at - cred.issued_at, Duration::days(7));
        assert!(!cred.is_expired_at(issued + Duration::days(6)));
        assert!(cred.is_expired_at(issued + Duration::days(7)));
    }

    #[test]
    fn static_gate_reads_and_clears() {
        let gate = StaticGate::with_token("abc");
        let cred = gate.credential();
        assert_eq!(cred.map(|c| c.token().expose_secret().to_owned()).as_deref(), Some("abc"));

        gate.clear_credential();
        assert!(gate.credential().is_none());
    }

    #[test]
    fn empty_gate_has_no_credential() {
        assert!(StaticGate::empty().credential().is_none());
    }
}

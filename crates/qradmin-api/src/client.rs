// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, per-request admin token
// headers, status classification and envelope unwrapping. Endpoint groups
// (auth, assets) live in sibling modules as inherent methods.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ADMIN_TOKEN_HEADER;
use crate::error::Error;
use crate::models::{EnvelopeKey, ErrorBody};
use crate::transport::TransportConfig;

/// Async client for the admin REST service.
///
/// Collection reads carry the admin token in the `x-admin-token` header;
/// the token is supplied per call because it is owned by the caller's
/// credential store, not by the client.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a service base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// The service base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Join a relative path (e.g. `"admin/get"`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Collection reads ─────────────────────────────────────────────

    /// Authenticated GET of a collection endpoint.
    ///
    /// Succeeds only when the status is 2xx and the body is an object whose
    /// `key` field is an array of well-formed records. Everything else is
    /// an [`Error::Http`], [`Error::Transport`] or [`Error::Schema`].
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &SecretString,
        key: EnvelopeKey,
    ) -> Result<Vec<T>, Error> {
        debug!(%url, envelope = key.as_str(), "GET collection");

        let resp = self
            .http
            .get(url)
            .header(ADMIN_TOKEN_HEADER, token_header(token)?)
            .send()
            .await?;

        let body = read_success(resp).await?;
        unwrap_envelope(&body, key)
    }

    /// Authenticated GET returning the raw JSON body.
    pub(crate) async fn get_authenticated(
        &self,
        url: Url,
        token: &SecretString,
    ) -> Result<String, Error> {
        debug!(%url, "GET");

        let resp = self
            .http
            .get(url)
            .header(ADMIN_TOKEN_HEADER, token_header(token)?)
            .send()
            .await?;

        read_success(resp).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Parse the base URL and make sure relative joins append to its path.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

pub(crate) fn token_header(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(token.expose_secret())
        .map_err(|e| Error::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Return the body of a 2xx response, or classify the failure.
pub(crate) async fn read_success(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(status = status.as_u16(), len = body.len(), "response body read");

    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::Http {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }
}

/// Extract a string `message` from an error body, if present.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::text)
        .filter(|m| !m.is_empty())
}

fn schema_error(detail: impl Into<String>, body: &str) -> Error {
    Error::Schema {
        detail: detail.into(),
        body: body.to_owned(),
    }
}

/// Unwrap `{ <key>: [...] }` into typed records.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    body: &str,
    key: EnvelopeKey,
) -> Result<Vec<T>, Error> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| schema_error(format!("body is not JSON: {e}"), body))?;

    let Some(field) = value.get(key.as_str()) else {
        return Err(schema_error(format!("missing `{}` field", key.as_str()), body));
    };
    if !field.is_array() {
        return Err(schema_error(
            format!("`{}` field is not an array", key.as_str()),
            body,
        ));
    }

    serde_json::from_value(field.clone()).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        schema_error(format!("{e} (body preview: {preview:?})"), body)
    })
}

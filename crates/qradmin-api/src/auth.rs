// Admin authentication endpoints
//
// Email/password login issues an opaque token that every later read
// carries in the `x-admin-token` header. Registration creates an admin
// account; the profile endpoint echoes the signed-in account back.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{AdminClient, read_success};
use crate::error::Error;
use crate::models::{AdminProfile, CredentialsBody, LoginResponse, ProfileResponse};

/// Header carrying the admin token on every authenticated request.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

const GENERIC_AUTH_FAILURE: &str = "Something went wrong";

impl AdminClient {
    /// Exchange email/password for an admin token.
    ///
    /// `POST admin/logIn` → `{ "token": "..." }`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, Error> {
        let url = self.endpoint("admin/logIn")?;
        debug!(%url, "logging in");

        let body = self.post_credentials(url, email, password).await?;
        let parsed: LoginResponse = serde_json::from_str(&body).map_err(|e| Error::Schema {
            detail: format!("login response: {e}"),
            body: body.clone(),
        })?;

        match parsed.token {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            _ => Err(Error::Schema {
                detail: "login response carried no token".into(),
                body,
            }),
        }
    }

    /// Create a new admin account.
    ///
    /// `POST admin/register`; a 2xx status is the only success signal.
    pub async fn register(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint("admin/register")?;
        debug!(%url, "registering admin account");

        self.post_credentials(url, email, password).await?;
        Ok(())
    }

    /// Fetch the signed-in admin's profile.
    ///
    /// `GET admin/get` → `{ "status": true, "data": { ... } }`
    pub async fn profile(&self, token: &SecretString) -> Result<AdminProfile, Error> {
        let url = self.endpoint("admin/get")?;
        let body = self.get_authenticated(url, token).await?;

        let parsed: ProfileResponse = serde_json::from_str(&body).map_err(|e| Error::Schema {
            detail: format!("profile response: {e}"),
            body: body.clone(),
        })?;

        match parsed {
            ProfileResponse {
                status: true,
                data: Some(profile),
            } => Ok(profile),
            _ => Err(Error::Schema {
                detail: "profile response had a false status or no data".into(),
                body,
            }),
        }
    }

    /// POST `{email, password}` and map any non-2xx into `Authentication`.
    async fn post_credentials(
        &self,
        url: url::Url,
        email: &str,
        password: &SecretString,
    ) -> Result<String, Error> {
        let resp = self
            .http()
            .post(url)
            .json(&CredentialsBody {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        match read_success(resp).await {
            Ok(body) => Ok(body),
            Err(Error::Http { message, .. }) => Err(Error::Authentication {
                message: message.unwrap_or_else(|| GENERIC_AUTH_FAILURE.into()),
            }),
            Err(other) => Err(other),
        }
    }
}

// Admin API response types
//
// Wire models for the admin REST service. Collection endpoints nest their
// records under an envelope key that differs per endpoint family. Fields
// use `#[serde(default)]` liberally because older records omit them.

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// The JSON field under which a collection endpoint nests its records.
///
/// ```json
/// { "message": [...] }   // user listing
/// { "data": [...] }      // code listings
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKey {
    Message,
    Data,
}

impl EnvelopeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Data => "data",
        }
    }
}

// ── Records ──────────────────────────────────────────────────────────

/// A downloadable asset reference (pre-signed or public URL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(default)]
    pub url: String,
}

/// A registered end user, from `admin/user/getAll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Raw ISO-8601 timestamp. Parsed lazily so one bad value does not
    /// reject the whole listing.
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// A text or link QR code owned by a user, from `admin/user/qr/textFilter/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCodeRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub purpose: String,
    /// `text` or `link`.
    #[serde(default, rename = "contentType")]
    pub content_type: String,
    /// Encoded payload: free text, a URL, or a document URL.
    #[serde(default)]
    pub text: String,
    /// The rendered QR image.
    #[serde(default)]
    pub file: Option<AssetRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// A file-backed QR code owned by a user, from `admin/user/qr/fileFilter/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCodeRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub purpose: String,
    /// `pdf` or `image`.
    #[serde(default, rename = "contentType")]
    pub content_type: String,
    /// The file the QR code points at.
    #[serde(default, rename = "uploadedFile")]
    pub uploaded_file: Option<AssetRef>,
    /// The rendered QR image.
    #[serde(default)]
    pub file: Option<AssetRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// The signed-in operator's own account, from `admin/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

// ── Auth payloads ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub data: Option<AdminProfile>,
}

/// Error bodies carry an optional human-readable `message`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The `message` field, only when it is a string. Collection endpoints
    /// reuse `message` as an array key, which is not an error message.
    pub fn text(self) -> Option<String> {
        match self.message? {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        }
    }
}

// ── Table views ──
//
// A view is everything that differs between listings: where the rows come
// from, which envelope key wraps them, the filter vocabulary and the export
// columns. The controller is generic over this trait.

use url::Url;

use qradmin_api::{AdminClient, EnvelopeKey, FileCodeRecord, TextCodeRecord, UserRecord};

use crate::csv::{Column, CsvField};
use crate::error::CoreError;
use crate::filter::{FileFilter, FilterValue, TextFilter, Unfiltered};
use crate::model::Row;

/// Per-listing configuration of a [`RemoteTableController`](crate::RemoteTableController).
pub trait TableView: Send + Sync + 'static {
    type Row: Row;
    type Filter: FilterValue;

    /// Envelope key the collection endpoint nests its rows under.
    const ENVELOPE: EnvelopeKey;

    /// Short human name, used in logs and headings.
    const TITLE: &'static str;

    /// File name of the CSV export.
    const EXPORT_FILE: &'static str;

    /// Unfiltered collection URL.
    fn resource(&self, client: &AdminClient) -> Result<Url, CoreError>;

    fn columns(&self) -> Vec<Column<Self::Row>>;
}

/// Append one path segment (percent-encoded) to a collection URL.
fn owner_resource(client: &AdminClient, base: &str, owner: &str) -> Result<Url, CoreError> {
    let mut url = client.endpoint(base)?;
    url.path_segments_mut()
        .map_err(|()| CoreError::Config {
            message: format!("service URL cannot carry a path: {}", client.base_url()),
        })?
        .pop_if_empty()
        .push(owner);
    Ok(url)
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersView;

impl TableView for UsersView {
    type Row = UserRecord;
    type Filter = Unfiltered;

    const ENVELOPE: EnvelopeKey = EnvelopeKey::Message;
    const TITLE: &'static str = "users";
    const EXPORT_FILE: &'static str = "users.csv";

    fn resource(&self, client: &AdminClient) -> Result<Url, CoreError> {
        Ok(client.endpoint("admin/user/getAll")?)
    }

    fn columns(&self) -> Vec<Column<UserRecord>> {
        vec![
            Column {
                label: "Name",
                extract: |u| CsvField::text(u.name.clone()),
            },
            Column {
                label: "Email",
                extract: |u| CsvField::text(u.email.clone()),
            },
            Column {
                label: "Role",
                extract: |u| CsvField::text(u.role.clone()),
            },
            Column {
                label: "Joined Date",
                extract: |u| CsvField::date(u.created_at.as_deref()),
            },
        ]
    }
}

// ── Text / link codes ────────────────────────────────────────────────

/// Text and link codes generated by one user.
#[derive(Debug, Clone)]
pub struct TextCodesView {
    pub owner: String,
}

impl TextCodesView {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

impl TableView for TextCodesView {
    type Row = TextCodeRecord;
    type Filter = TextFilter;

    const ENVELOPE: EnvelopeKey = EnvelopeKey::Data;
    const TITLE: &'static str = "text codes";
    const EXPORT_FILE: &'static str = "qr_data.csv";

    fn resource(&self, client: &AdminClient) -> Result<Url, CoreError> {
        owner_resource(client, "admin/user/qr/textFilter", &self.owner)
    }

    fn columns(&self) -> Vec<Column<TextCodeRecord>> {
        vec![
            Column {
                label: "Purpose",
                extract: |r| CsvField::text(r.purpose.clone()),
            },
            Column {
                label: "Content Type",
                extract: |r| CsvField::text(r.content_type.clone()),
            },
            Column {
                label: "Text/Link",
                extract: |r| CsvField::text(r.text.clone()),
            },
            Column {
                label: "Created At",
                extract: |r| CsvField::date(r.created_at.as_deref()),
            },
        ]
    }
}

// ── File codes ───────────────────────────────────────────────────────

/// File-backed codes generated by one user.
#[derive(Debug, Clone)]
pub struct FileCodesView {
    pub owner: String,
}

impl FileCodesView {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

fn asset_url(asset: Option<&qradmin_api::AssetRef>) -> String {
    asset.map(|a| a.url.clone()).unwrap_or_default()
}

impl TableView for FileCodesView {
    type Row = FileCodeRecord;
    type Filter = FileFilter;

    const ENVELOPE: EnvelopeKey = EnvelopeKey::Data;
    const TITLE: &'static str = "file codes";
    const EXPORT_FILE: &'static str = "file_qr_data.csv";

    fn resource(&self, client: &AdminClient) -> Result<Url, CoreError> {
        owner_resource(client, "admin/user/qr/fileFilter", &self.owner)
    }

    fn columns(&self) -> Vec<Column<FileCodeRecord>> {
        vec![
            Column {
                label: "Purpose",
                extract: |r| CsvField::text(r.purpose.clone()),
            },
            Column {
                label: "Content Type",
                extract: |r| CsvField::text(r.content_type.clone()),
            },
            Column {
                label: "Uploaded File",
                extract: |r| CsvField::text(asset_url(r.uploaded_file.as_ref())),
            },
            Column {
                label: "QR Code",
                extract: |r| CsvField::text(asset_url(r.file.as_ref())),
            },
            Column {
                label: "Created At",
                extract: |r| CsvField::date(r.created_at.as_deref()),
            },
        ]
    }
}

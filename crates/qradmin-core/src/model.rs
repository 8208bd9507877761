// ── Row model ──
//
// The remote records, seen through one trait so a single controller can
// drive every listing. Rows are immutable once fetched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use qradmin_api::{FileCodeRecord, TextCodeRecord, UserRecord};

/// Display/export format for creation dates, e.g. `01-Jan-2024`.
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Rendering of a timestamp that is absent or unparseable.
pub const INVALID_DATE: &str = "Invalid Date";

/// A record returned by a remote collection.
pub trait Row: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Stable unique identifier.
    fn id(&self) -> &str;

    /// Human-readable label (name, purpose).
    fn label(&self) -> &str;

    /// Content-type discriminator (role for users).
    fn content_type(&self) -> &str;

    /// Raw creation timestamp.
    fn created_at(&self) -> Option<&str>;

    /// Text searched by the quick filter.
    fn search_text(&self) -> String {
        format!("{} {} {}", self.id(), self.label(), self.content_type())
    }
}

impl Row for UserRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.role
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.email, self.role)
    }
}

impl Row for TextCodeRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.purpose
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.purpose, self.content_type, self.text)
    }
}

impl Row for FileCodeRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.purpose
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

// ── Timestamps ───────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Render a creation date as `dd-Mon-yyyy` in UTC.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp).map_or_else(
        || INVALID_DATE.to_owned(),
        |ts| ts.format(DATE_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_day_abbreviated_month_year() {
        assert_eq!(format_date(Some("2024-01-01T00:00:00Z")), "01-Jan-2024");
        assert_eq!(format_date(Some("2023-11-09T18:30:00.000Z")), "09-Nov-2023");
        assert_eq!(format_date(Some("2024-02-29")), "29-Feb-2024");
    }

    #[test]
    fn unparseable_dates_render_as_invalid() {
        assert_eq!(format_date(None), INVALID_DATE);
        assert_eq!(format_date(Some("yesterday")), INVALID_DATE);
    }

    #[test]
    fn text_code_search_covers_link() {
        let rec = TextCodeRecord {
            id: "c1".into(),
            purpose: "menu".into(),
            content_type: "link".into(),
            text: "https://x.io/menu".into(),
            file: None,
            created_at: None,
        };
        assert!(rec.search_text().contains("https://x.io/menu"));
        assert_eq!(rec.label(), "menu");
    }
}

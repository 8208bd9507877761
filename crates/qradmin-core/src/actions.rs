// ── Row actions ──
//
// Classification is pure: a value plus its declared content type decides
// between document, link and inert text. The dispatcher then performs the
// matching effect. Failures are scoped to the action and never reach a
// controller's state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use qradmin_api::AdminClient;

use crate::effects::{ClientEffects, FALLBACK_FILE_NAME};
use crate::error::CoreError;
use crate::navigation::{Navigator, Route};

/// Extensions (lowercase, without dot) treated as downloadable documents.
pub const DOCUMENT_EXTENSIONS: [&str; 4] = ["doc", "docx", "pdf", "txt"];

/// Declared content type that marks a value as a hyperlink.
pub const LINK_CONTENT_TYPE: &str = "link";

/// What a row value is, for the purpose of acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentClass {
    /// Ends in a document extension; downloaded on activation.
    Document { extension: String },
    /// Declared as a link; opened externally on activation.
    Link,
    /// Displayed only.
    Text,
}

impl ContentClass {
    /// Call-to-action label for the value, `None` for inert text.
    pub fn action_label(&self) -> Option<String> {
        match self {
            Self::Document { extension } => {
                Some(format!("Download {}", extension.to_ascii_uppercase()))
            }
            Self::Link => Some("Open link".to_owned()),
            Self::Text => None,
        }
    }
}

/// Classify a row value. Document extension wins over a `link` content type.
pub fn classify(value: &str, content_type: &str) -> ContentClass {
    if let Some(extension) = document_extension(value) {
        return ContentClass::Document { extension };
    }
    if content_type.eq_ignore_ascii_case(LINK_CONTENT_TYPE) {
        return ContentClass::Link;
    }
    ContentClass::Text
}

fn document_extension(value: &str) -> Option<String> {
    let (_, ext) = value.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    DOCUMENT_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Local file name for a downloaded asset: the last non-empty path segment,
/// kept in its encoded form.
pub fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map_or_else(|| FALLBACK_FILE_NAME.to_owned(), str::to_owned)
}

/// Result of activating a row value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Downloaded(PathBuf),
    Opened(Url),
    /// Nothing to do for inert text.
    Inert,
}

/// Performs row-level effects against injected collaborators.
#[derive(Clone)]
pub struct RowActionDispatcher {
    client: AdminClient,
    effects: Arc<dyn ClientEffects>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for RowActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowActionDispatcher")
            .field("base_url", &self.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl RowActionDispatcher {
    pub fn new(
        client: AdminClient,
        effects: Arc<dyn ClientEffects>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            effects,
            navigator,
        }
    }

    /// Fetch `url` anonymously and save it under its final path segment.
    pub async fn download(&self, url: &str) -> Result<PathBuf, CoreError> {
        let parsed = Url::parse(url).map_err(|e| CoreError::Download {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        debug!(%parsed, "downloading asset");
        let bytes = match self.client.download_asset(&parsed).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%parsed, error = %e, "asset download failed");
                return Err(CoreError::Download {
                    url: url.to_owned(),
                    reason: e.to_string(),
                });
            }
        };

        let name = filename_from_url(&parsed);
        let path = self.effects.save_file(&name, &bytes)?;
        info!(path = %path.display(), "asset downloaded");
        Ok(path)
    }

    /// Open `url` in a new browsing context.
    pub fn open_external(&self, url: &str) -> Result<Url, CoreError> {
        let parsed = Url::parse(url).map_err(|e| CoreError::Effect {
            message: format!("not a URL: {url} ({e})"),
        })?;
        self.effects.open_url(&parsed)?;
        Ok(parsed)
    }

    /// Classify `value` and perform the matching effect.
    pub async fn activate(&self, value: &str, content_type: &str) -> Result<ActionOutcome, CoreError> {
        match classify(value, content_type) {
            ContentClass::Document { .. } => self.download(value).await.map(ActionOutcome::Downloaded),
            ContentClass::Link => self.open_external(value).map(ActionOutcome::Opened),
            ContentClass::Text => Ok(ActionOutcome::Inert),
        }
    }

    /// Navigate to a user's code listings.
    pub fn view_details(&self, user_id: &str) {
        self.navigator.navigate(Route::UserDetail(user_id.to_owned()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn document_extensions_are_case_insensitive() {
        assert_eq!(
            classify("https://cdn/x/REPORT.PDF", "link"),
            ContentClass::Document {
                extension: "pdf".into()
            }
        );
        assert!(matches!(classify("notes.Txt", "text"), ContentClass::Document { .. }));
        assert!(matches!(classify("a.docx", "text"), ContentClass::Document { .. }));
    }

    #[test]
    fn extension_must_end_the_value() {
        assert_eq!(classify("report.pdf ", "text"), ContentClass::Text);
        assert_eq!(classify("https://cdn/report.pdf?v=2", "link"), ContentClass::Link);
    }

    #[test]
    fn links_without_document_extension_open_externally() {
        assert_eq!(classify("http://x", "link"), ContentClass::Link);
        assert_eq!(classify("https://site/page.html", "LINK"), ContentClass::Link);
    }

    #[test]
    fn everything_else_is_inert() {
        assert_eq!(classify("hello world", "text"), ContentClass::Text);
        assert_eq!(classify("http://x", "text"), ContentClass::Text);
        assert_eq!(classify("archive.zip", "pdf"), ContentClass::Text);
        assert_eq!(classify("pdf", "text"), ContentClass::Text);
    }

    #[test]
    fn action_labels() {
        let doc = classify("a.pdf", "text");
        assert_eq!(doc.action_label().as_deref(), Some("Download PDF"));
        assert_eq!(ContentClass::Text.action_label(), None);
    }

    #[test]
    fn filename_is_last_path_segment() {
        let url = Url::parse("https://cdn.example.com/uploads/2024/menu.pdf?sig=abc").unwrap();
        assert_eq!(filename_from_url(&url), "menu.pdf");

        let url = Url::parse("https://cdn.example.com/files/my%20doc.txt").unwrap();
        assert_eq!(filename_from_url(&url), "my%20doc.txt");

        let url = Url::parse("https://cdn.example.com/dir/").unwrap();
        assert_eq!(filename_from_url(&url), "dir");

        let url = Url::parse("https://cdn.example.com/").unwrap();
        assert_eq!(filename_from_url(&url), FALLBACK_FILE_NAME);
    }
}

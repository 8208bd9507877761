// ── Client-side effects ──
//
// The boundary between deciding and doing: row actions and exports hand
// bytes or URLs to a `ClientEffects` and never touch the filesystem or a
// browser themselves.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};
use url::Url;

use crate::error::CoreError;

/// File name used when a URL yields nothing usable.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Local effects triggered by row actions and exports.
pub trait ClientEffects: Send + Sync {
    /// Materialize `bytes` as a local file called `name`; returns where it landed.
    fn save_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError>;

    /// Open `url` in a new browsing context.
    fn open_url(&self, url: &Url) -> Result<(), CoreError>;
}

/// Strip directory components and control characters from a file name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

// ── Disk ─────────────────────────────────────────────────────────────

/// Writes into a download directory and opens URLs with the platform opener.
#[derive(Debug, Clone)]
pub struct DiskEffects {
    dir: PathBuf,
    opener: Option<String>,
}

impl DiskEffects {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            opener: None,
        }
    }

    /// Use a specific program instead of the platform default opener.
    #[must_use]
    pub fn with_opener(mut self, program: impl Into<String>) -> Self {
        self.opener = Some(program.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn opener_command(&self, url: &str) -> Command {
        if let Some(program) = &self.opener {
            let mut cmd = Command::new(program);
            cmd.arg(url);
            return cmd;
        }
        platform_opener(url)
    }
}

#[cfg(target_os = "macos")]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

fn effect_error(context: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::Effect {
        message: format!("{context}: {err}"),
    }
}

impl ClientEffects for DiskEffects {
    fn save_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| effect_error(&format!("create {}", self.dir.display()), e))?;

        let target = self.dir.join(sanitize_file_name(name));

        // Stage in the same directory so the final rename never crosses filesystems.
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| effect_error("create temporary file", e))?;
        staged
            .write_all(bytes)
            .and_then(|()| staged.flush())
            .map_err(|e| effect_error("write temporary file", e))?;
        staged
            .persist(&target)
            .map_err(|e| effect_error(&format!("save {}", target.display()), e.error))?;

        info!(path = %target.display(), size = bytes.len(), "file saved");
        Ok(target)
    }

    fn open_url(&self, url: &Url) -> Result<(), CoreError> {
        debug!(%url, "opening externally");
        self.opener_command(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| effect_error(&format!("open {url}"), e))
    }
}

// ── In-memory ────────────────────────────────────────────────────────

/// A file handed to [`MemoryEffects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Effects that only record what was asked of them.
#[derive(Debug, Default)]
pub struct MemoryEffects {
    files: Mutex<Vec<SavedFile>>,
    opened: Mutex<Vec<Url>>,
}

impl MemoryEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<SavedFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ClientEffects for MemoryEffects {
    fn save_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError> {
        let name = sanitize_file_name(name);
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SavedFile {
                name: name.clone(),
                bytes: bytes.to_vec(),
            });
        Ok(PathBuf::from(name))
    }

    fn open_url(&self, url: &Url) -> Result<(), CoreError> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_path_like_names() {
        assert_eq!(sanitize_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("  "), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("..."), FALLBACK_FILE_NAME);
    }

    #[test]
    fn disk_effects_persist_into_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let effects = DiskEffects::new(dir.path().join("downloads"));

        let path = effects.save_file("menu.pdf", b"%PDF-1.4").unwrap();

        assert_eq!(path, dir.path().join("downloads").join("menu.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        // Only the persisted file remains; the staging file is gone.
        let entries = std::fs::read_dir(dir.path().join("downloads")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn disk_effects_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let effects = DiskEffects::new(dir.path());

        effects.save_file("users.csv", b"old").unwrap();
        let path = effects.save_file("users.csv", b"new").unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn memory_effects_record_calls() {
        let effects = MemoryEffects::new();
        effects.save_file("a.txt", b"x").unwrap();
        effects
            .open_url(&Url::parse("https://example.com/").unwrap())
            .unwrap();

        assert_eq!(effects.files()[0].name, "a.txt");
        assert_eq!(effects.opened().len(), 1);
    }
}

//! Writing the summary to disk and handing it to a browser.
//!
//! The browser window is a new, independently lived context: we spawn the
//! opener and never track or close it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Each export overwrites the previous one, matching the one-summary model.
pub const EXPORT_FILE_NAME: &str = "matome-summary.html";

/// Openers to try, most generic first
const OPENERS: &[&str] = &["xdg-open", "open", "firefox", "chromium", "google-chrome"];

/// Default export location: the user data dir, or the temp dir without one
pub fn default_export_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("matome"))
        .unwrap_or_else(std::env::temp_dir)
}

/// Write the summary HTML exactly as received.
pub fn save_html(dir: &Path, html: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("could not create {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, html)
        .with_context(|| format!("could not write {}", path.display()))?;
    Ok(path)
}

/// Launch the first available opener on the exported file, detached.
pub fn open_in_browser(path: &Path) -> Result<()> {
    for &opener in OPENERS {
        let spawned = Command::new(opener)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if spawned.is_ok() {
            tracing::info!(opener, path = %path.display(), "opened summary externally");
            return Ok(());
        }
    }
    anyhow::bail!("No browser found (tried {})", OPENERS.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_the_html_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let html = "<div><p>line one</p>\n<p>line two</p></div>";

        let path = save_html(dir.path(), html).unwrap();

        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), html);
    }

    #[test]
    fn save_creates_missing_directories_and_supersedes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/matome");

        save_html(&nested, "<p>first</p>").unwrap();
        let path = save_html(&nested, "<p>second</p>").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "<p>second</p>");
    }
}

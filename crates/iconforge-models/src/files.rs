//! File content provider
//!
//! The only place in this crate that touches the filesystem. The engine and
//! the asset model depend on these two operations and nothing else.

use crate::content::Content;
use std::io;
use std::path::{Path, PathBuf};

/// Read a file into a [`Content`] payload
///
/// Valid UTF-8 becomes [`Content::Text`], anything else [`Content::Binary`].
///
/// # Errors
/// Propagates the underlying read failure.
pub async fn get_file_contents(path: &Path) -> io::Result<Content> {
    let bytes = tokio::fs::read(path).await?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Content::Text(text)),
        Err(err) => Ok(Content::Binary(err.into_bytes())),
    }
}

/// Write a content payload as `{dir}/{name}.{extension}`
///
/// Creates `dir` recursively if needed and returns the written path.
///
/// # Errors
/// Propagates directory creation or write failures.
pub async fn save_content_to_file(
    dir: &Path,
    name: &str,
    content: &Content,
    extension: &str,
) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let file_path = dir.join(format!("{name}.{extension}"));
    tokio::fs::write(&file_path, content.as_bytes()).await?;
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_utf8_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.svg");
        tokio::fs::write(&path, "<svg/>").await.unwrap();

        let content = get_file_contents(&path).await.unwrap();
        assert_eq!(content.as_text(), Some("<svg/>"));
    }

    #[tokio::test]
    async fn reads_non_utf8_as_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.png");
        tokio::fs::write(&path, [0x89u8, 0x50, 0xff, 0xfe]).await.unwrap();

        let content = get_file_contents(&path).await.unwrap();
        assert!(content.as_text().is_none());
        assert_eq!(content.as_bytes(), &[0x89, 0x50, 0xff, 0xfe]);
    }

    #[tokio::test]
    async fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("tmp");

        let written = save_content_to_file(&scratch, "home_dark", &"<svg/>".into(), "svg")
            .await
            .unwrap();

        assert_eq!(written, scratch.join("home_dark.svg"));
        assert_eq!(tokio::fs::read_to_string(&written).await.unwrap(), "<svg/>");
    }
}

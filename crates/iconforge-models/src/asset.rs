//! Asset value object
//!
//! The smallest unit the pipeline moves around: one physical or in-memory
//! icon file, anchored to its icon directory.
//!
//! # Invariants
//! - `icon_path` is always absolute (construction fails otherwise)
//! - `path` is always stored relative to `icon_path`; the absolute location
//!   is derived on demand and never cached separately

use crate::content::Content;
use crate::error::{AssetError, ConfigError};
use crate::files;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::sync::OnceCell;

/// Persisted projection of an asset, as stored in the icon manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetConfig {
    /// Asset name; defaults to the file stem when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path relative to the icon directory, exported in `./`-prefixed form
    pub path: String,
    /// In-memory payload, e.g. produced by an upstream plugin; never
    /// serialized into the manifest
    #[serde(skip)]
    pub contents: Option<Content>,
}

impl AssetConfig {
    /// Config with just a path
    #[inline]
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            contents: None,
        }
    }

    /// Set the name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an in-memory payload
    #[inline]
    #[must_use]
    pub fn with_contents(mut self, contents: impl Into<Content>) -> Self {
        self.contents = Some(contents.into());
        self
    }
}

/// A single icon asset
///
/// Contents are loaded lazily from disk on first access and memoized, unless
/// supplied eagerly through the config (the in-memory case).
#[derive(Debug)]
pub struct Asset {
    name: String,
    icon_path: PathBuf,
    path: PathBuf,
    contents: OnceCell<Content>,
}

impl Asset {
    /// Create a new asset anchored to `icon_path`
    ///
    /// # Errors
    /// - [`ConfigError::IconPathNotAbsolute`] if `icon_path` is relative
    /// - [`ConfigError::PathOutsideIcon`] if an absolute config path does
    ///   not live under `icon_path`
    pub fn new(icon_path: impl Into<PathBuf>, config: AssetConfig) -> Result<Self, ConfigError> {
        let icon_path = icon_path.into();
        if !icon_path.is_absolute() {
            return Err(ConfigError::IconPathNotAbsolute { path: icon_path });
        }

        let path = relative_to_icon(&icon_path, &config.path)?;
        let name = match config.name {
            Some(name) => name,
            None => path
                .file_stem()
                .map_or_else(|| config.path.clone(), |stem| stem.to_string_lossy().into_owned()),
        };
        let contents = OnceCell::new_with(config.contents);

        tracing::debug!(asset = %name, icon_path = %icon_path.display(), "asset created");
        Ok(Self {
            name,
            icon_path,
            path,
            contents,
        })
    }

    /// Asset name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute directory of the owning icon
    #[inline]
    #[must_use]
    pub fn icon_path(&self) -> &Path {
        &self.icon_path
    }

    /// Path relative to the icon directory
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute location of the asset, derived from `icon_path` + `path`
    #[inline]
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.icon_path.join(&self.path)
    }

    /// Projection stored in the icon manifest
    #[must_use]
    pub fn config(&self) -> AssetConfig {
        AssetConfig {
            name: Some(self.name.clone()),
            path: format!("./{}", self.path.display()),
            contents: None,
        }
    }

    /// Contents of this asset
    ///
    /// Reads the file from disk on first access and memoizes the result;
    /// eagerly supplied contents are returned without touching the disk.
    ///
    /// # Errors
    /// [`AssetError::ReadContents`] if the lazy load fails.
    pub async fn contents(&self) -> Result<&Content, AssetError> {
        self.contents
            .get_or_try_init(|| async {
                let path = self.resolved_path();
                tracing::debug!(asset = %self.name, path = %path.display(), "reading contents from disk");
                files::get_file_contents(&path)
                    .await
                    .map_err(|source| AssetError::ReadContents { path, source })
            })
            .await
    }

    /// Contents already held in memory, if any
    ///
    /// Never triggers a disk read; used by the engine to decide what
    /// `write_to_output` must persist.
    #[inline]
    #[must_use]
    pub fn in_memory_contents(&self) -> Option<&Content> {
        self.contents.get()
    }
}

impl Clone for Asset {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            icon_path: self.icon_path.clone(),
            path: self.path.clone(),
            contents: match self.contents.get() {
                Some(contents) => OnceCell::from(contents.clone()),
                None => OnceCell::new(),
            },
        }
    }
}

/// Normalize a config path to the relative-to-icon form
///
/// Rejects anything that would resolve outside the icon directory: absolute
/// paths not under it, and `..` traversal in either form.
fn relative_to_icon(icon_path: &Path, raw: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = raw.strip_prefix("./").unwrap_or(raw);
    let path = Path::new(trimmed);
    let outside = || ConfigError::PathOutsideIcon {
        path: path.to_path_buf(),
        icon_path: icon_path.to_path_buf(),
    };

    let relative = if path.is_absolute() {
        path.strip_prefix(icon_path)
            .map(Path::to_path_buf)
            .map_err(|_| outside())?
    } else {
        path.to_path_buf()
    };
    if relative
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(outside());
    }
    Ok(relative)
}

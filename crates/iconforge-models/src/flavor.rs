//! Flavor value object
//!
//! A flavor is a named variant of an asset: one point in the iterant
//! combination space, produced during pipeline expansion. It shares the
//! asset's structural contract (path resolution, lazy contents, config
//! projection) and additionally remembers which property combination
//! produced it.

use crate::asset::{Asset, AssetConfig};
use crate::content::Content;
use crate::error::{AssetError, ConfigError};
use crate::prop_combinator::PropCombination;
use std::path::{Path, PathBuf};

/// A named asset variant with provenance
#[derive(Debug, Clone)]
pub struct Flavor {
    asset: Asset,
    combo: Option<PropCombination>,
}

impl Flavor {
    /// Create a flavor anchored to `icon_path`
    ///
    /// Unlike assets, flavors must be explicitly named.
    ///
    /// # Errors
    /// - [`ConfigError::MissingFlavorName`] if the config has no name
    /// - any [`Asset`] construction error
    pub fn new(icon_path: impl Into<PathBuf>, config: AssetConfig) -> Result<Self, ConfigError> {
        if config.name.is_none() {
            return Err(ConfigError::MissingFlavorName {
                path: config.path.clone(),
            });
        }
        Ok(Self {
            asset: Asset::new(icon_path, config)?,
            combo: None,
        })
    }

    /// Attach the property combination this flavor was produced under
    #[inline]
    #[must_use]
    pub fn with_combo(mut self, combo: PropCombination) -> Self {
        self.combo = Some(combo);
        self
    }

    /// The property combination this flavor was produced under, if known
    #[inline]
    #[must_use]
    pub fn combo(&self) -> Option<&PropCombination> {
        self.combo.as_ref()
    }

    /// Flavor name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.asset.name()
    }

    /// Path relative to the icon directory
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.asset.path()
    }

    /// Absolute location of the flavor
    #[inline]
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.asset.resolved_path()
    }

    /// Projection stored in the icon manifest
    #[inline]
    #[must_use]
    pub fn config(&self) -> AssetConfig {
        self.asset.config()
    }

    /// Contents, loaded lazily like an asset's
    ///
    /// # Errors
    /// [`AssetError::ReadContents`] if the lazy load fails.
    pub async fn contents(&self) -> Result<&Content, AssetError> {
        self.asset.contents().await
    }

    /// Contents already held in memory, if any
    #[inline]
    #[must_use]
    pub fn in_memory_contents(&self) -> Option<&Content> {
        self.asset.in_memory_contents()
    }
}

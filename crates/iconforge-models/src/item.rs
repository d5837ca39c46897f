//! Pipeline items
//!
//! The engine treats assets and flavors interchangeably. [`IconAsset`] is
//! the capability seam (name, path resolution, lazy contents, config
//! projection) and [`PipelineItem`] is the closed item type that flows
//! between plugin stages.

use crate::asset::{Asset, AssetConfig};
use crate::content::Content;
use crate::error::AssetError;
use crate::flavor::Flavor;
use crate::prop_combinator::PropCombination;
use async_trait::async_trait;
use std::path::PathBuf;

/// Capability set shared by assets and flavors
///
/// The engine depends only on this interface, never on the concrete type.
#[async_trait]
pub trait IconAsset: Send + Sync {
    /// Item name
    fn name(&self) -> &str;

    /// Absolute location, derived from the icon anchor and relative path
    fn resolved_path(&self) -> PathBuf;

    /// Manifest projection (`{name, path}`)
    fn config(&self) -> AssetConfig;

    /// Contents, loaded lazily from disk on first access
    ///
    /// # Errors
    /// [`AssetError::ReadContents`] if the lazy load fails.
    async fn contents(&self) -> Result<&Content, AssetError>;

    /// Contents already held in memory; never triggers a disk read
    fn in_memory_contents(&self) -> Option<&Content>;
}

#[async_trait]
impl IconAsset for Asset {
    fn name(&self) -> &str {
        Asset::name(self)
    }

    fn resolved_path(&self) -> PathBuf {
        Asset::resolved_path(self)
    }

    fn config(&self) -> AssetConfig {
        Asset::config(self)
    }

    async fn contents(&self) -> Result<&Content, AssetError> {
        Asset::contents(self).await
    }

    fn in_memory_contents(&self) -> Option<&Content> {
        Asset::in_memory_contents(self)
    }
}

#[async_trait]
impl IconAsset for Flavor {
    fn name(&self) -> &str {
        Flavor::name(self)
    }

    fn resolved_path(&self) -> PathBuf {
        Flavor::resolved_path(self)
    }

    fn config(&self) -> AssetConfig {
        Flavor::config(self)
    }

    async fn contents(&self) -> Result<&Content, AssetError> {
        Flavor::contents(self).await
    }

    fn in_memory_contents(&self) -> Option<&Content> {
        Flavor::in_memory_contents(self)
    }
}

/// An asset or flavor moving through the plugin pipeline
#[derive(Debug, Clone)]
pub enum PipelineItem {
    /// A source asset
    Asset(Asset),
    /// A generated variant
    Flavor(Flavor),
}

impl PipelineItem {
    /// The flavor inside, if this item is one
    #[inline]
    #[must_use]
    pub fn as_flavor(&self) -> Option<&Flavor> {
        match self {
            Self::Flavor(flavor) => Some(flavor),
            Self::Asset(_) => None,
        }
    }

    /// Stamp provenance onto a combo-less flavor
    ///
    /// Assets and flavors that already carry a combination pass through
    /// unchanged.
    #[must_use]
    pub(crate) fn stamp_combo(self, combo: &PropCombination) -> Self {
        match self {
            Self::Flavor(flavor) if flavor.combo().is_none() => {
                Self::Flavor(flavor.with_combo(combo.clone()))
            }
            other => other,
        }
    }
}

#[async_trait]
impl IconAsset for PipelineItem {
    fn name(&self) -> &str {
        match self {
            Self::Asset(asset) => asset.name(),
            Self::Flavor(flavor) => flavor.name(),
        }
    }

    fn resolved_path(&self) -> PathBuf {
        match self {
            Self::Asset(asset) => asset.resolved_path(),
            Self::Flavor(flavor) => flavor.resolved_path(),
        }
    }

    fn config(&self) -> AssetConfig {
        match self {
            Self::Asset(asset) => asset.config(),
            Self::Flavor(flavor) => flavor.config(),
        }
    }

    async fn contents(&self) -> Result<&Content, AssetError> {
        match self {
            Self::Asset(asset) => asset.contents().await,
            Self::Flavor(flavor) => flavor.contents().await,
        }
    }

    fn in_memory_contents(&self) -> Option<&Content> {
        match self {
            Self::Asset(asset) => asset.in_memory_contents(),
            Self::Flavor(flavor) => flavor.in_memory_contents(),
        }
    }
}

impl From<Asset> for PipelineItem {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

impl From<Flavor> for PipelineItem {
    fn from(flavor: Flavor) -> Self {
        Self::Flavor(flavor)
    }
}

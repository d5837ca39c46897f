//! Icon aggregate root
//!
//! An icon groups one or more source assets under a shared name, carries
//! the iterant declarations that drive combinatorial plugin expansion, and
//! owns the flavors appended by pipeline runs.

use crate::asset::{Asset, AssetConfig};
use crate::error::ConfigError;
use crate::flavor::Flavor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single concrete iterant value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterantValue {
    /// Textual value, e.g. a theme name
    Text(String),
    /// Numeric value, e.g. a pixel size
    Number(i64),
    /// Boolean toggle
    Flag(bool),
}

impl fmt::Display for IterantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for IterantValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for IterantValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for IterantValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for IterantValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// Declared values of one iterant axis
///
/// Config files may declare a bare scalar; it normalizes to a
/// single-element axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterantDecl {
    /// A single scalar value
    One(IterantValue),
    /// An explicit list of values
    Many(Vec<IterantValue>),
}

impl IterantDecl {
    /// Normalized value list (scalars wrap into a single-element vector)
    #[must_use]
    pub fn values(&self) -> Vec<IterantValue> {
        match self {
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }
}

/// Persisted projection of an icon, as stored in its manifest file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    /// Icon name
    pub icon_name: String,
    /// Optional grouping category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Iterant axes, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub iterants: IndexMap<String, IterantDecl>,
    /// Source assets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetConfig>,
    /// Flavors generated by earlier pipeline runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavors: Vec<AssetConfig>,
}

/// The aggregate root owning assets, flavors and iterant declarations
#[derive(Debug, Clone)]
pub struct Icon {
    icon_name: String,
    icon_path: PathBuf,
    category: Option<String>,
    iterants: IndexMap<String, IterantDecl>,
    assets: Vec<Asset>,
    flavors: Vec<Flavor>,
}

impl Icon {
    /// Build an icon from its manifest config
    ///
    /// # Errors
    /// - [`ConfigError::IconPathNotAbsolute`] if `icon_path` is relative
    /// - any asset or flavor construction error from the config entries
    pub fn new(icon_path: impl Into<PathBuf>, config: IconConfig) -> Result<Self, ConfigError> {
        let icon_path = icon_path.into();
        if !icon_path.is_absolute() {
            return Err(ConfigError::IconPathNotAbsolute { path: icon_path });
        }

        let assets = config
            .assets
            .into_iter()
            .map(|asset_config| Asset::new(&icon_path, asset_config))
            .collect::<Result<Vec<_>, _>>()?;
        let flavors = config
            .flavors
            .into_iter()
            .map(|flavor_config| Flavor::new(&icon_path, flavor_config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            icon_name: config.icon_name,
            icon_path,
            category: config.category,
            iterants: config.iterants,
            assets,
            flavors,
        })
    }

    /// Icon name
    #[inline]
    #[must_use]
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    /// Absolute icon directory
    #[inline]
    #[must_use]
    pub fn icon_path(&self) -> &Path {
        &self.icon_path
    }

    /// Grouping category, if any
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Declared iterant axes
    #[inline]
    #[must_use]
    pub fn iterants(&self) -> &IndexMap<String, IterantDecl> {
        &self.iterants
    }

    /// Normalized values of one iterant axis, or `None` if undeclared
    #[must_use]
    pub fn iterant_values(&self, name: &str) -> Option<Vec<IterantValue>> {
        self.iterants.get(name).map(IterantDecl::values)
    }

    /// Source assets owned by this icon
    #[inline]
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Flavors owned by this icon
    #[inline]
    #[must_use]
    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    /// Append a flavor produced by a pipeline run
    ///
    /// The only mutation the pipeline performs on an icon.
    pub fn push_flavor(&mut self, flavor: Flavor) {
        self.flavors.push(flavor);
    }

    /// Projection stored in the manifest file
    #[must_use]
    pub fn config(&self) -> IconConfig {
        IconConfig {
            icon_name: self.icon_name.clone(),
            category: self.category.clone(),
            iterants: self.iterants.clone(),
            assets: self.assets.iter().map(Asset::config).collect(),
            flavors: self.flavors.iter().map(Flavor::config).collect(),
        }
    }
}

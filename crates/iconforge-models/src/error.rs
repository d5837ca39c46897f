//! Error types for the icon data model and plugin engine
//!
//! Three failure families, per the engine contract:
//! - configuration problems (missing iterants, bad paths, empty chains)
//! - asset content I/O failures
//! - scratch-output persistence failures
//!
//! Plugin-internal failures are carried verbatim as [`anyhow::Error`] inside
//! [`PipelineError::PluginExecution`]; the engine never retries, downgrades
//! or logs-and-continues.

use std::path::PathBuf;

/// Configuration errors
///
/// Non-recoverable for the current asset/plugin chain; surfaced before any
/// plugin function runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A plugin declared an iterant the icon does not define
    #[error("Could not find {iterant} in the config file of {icon_name}")]
    MissingIterant {
        /// The iterant name the plugin asked for
        iterant: String,
        /// Name of the icon whose config was searched
        icon_name: String,
    },

    /// An asset or icon was anchored to a relative path
    #[error("icon path must be absolute: {}", path.display())]
    IconPathNotAbsolute {
        /// The offending path
        path: PathBuf,
    },

    /// An asset path resolves outside its icon directory
    #[error("asset path {} escapes the icon directory {}", path.display(), icon_path.display())]
    PathOutsideIcon {
        /// The absolute asset path from the config
        path: PathBuf,
        /// The icon directory it must live under
        icon_path: PathBuf,
    },

    /// A flavor config carried no name
    #[error("flavor config for {path} is missing a name")]
    MissingFlavorName {
        /// Path of the unnamed flavor
        path: String,
    },

    /// `apply_plugins_on_asset` was called with an empty chain
    #[error("plugin chain must contain at least one plugin")]
    EmptyPluginChain,
}

/// Asset content errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Lazy content load from disk failed
    #[error("failed to read contents of {}: {source}", path.display())]
    ReadContents {
        /// Resolved absolute path of the asset
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Failure writing a plugin output to the scratch directory
#[derive(Debug, thiserror::Error)]
#[error("failed to persist {name} under {}: {source}", dir.display())]
pub struct PersistenceError {
    /// Name of the output item being written
    pub name: String,
    /// Scratch directory targeted by the write
    pub dir: PathBuf,
    /// Underlying I/O failure
    #[source]
    pub source: std::io::Error,
}

/// Umbrella error returned by the plugin application engine
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Asset content load failure
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// A plugin's transformation function failed
    ///
    /// The original error is carried whole; `plugin` and `item` add chain
    /// context without replacing it.
    #[error("plugin '{plugin}' failed on '{item}': {error}")]
    PluginExecution {
        /// Name of the failing plugin
        plugin: String,
        /// Name of the input item it was processing
        item: String,
        /// The error exactly as the plugin raised it
        error: anyhow::Error,
    },

    /// Scratch persistence failure
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl PipelineError {
    /// Whether this error originated inside a plugin function
    #[inline]
    #[must_use]
    pub fn is_plugin_failure(&self) -> bool {
        matches!(self, Self::PluginExecution { .. })
    }
}

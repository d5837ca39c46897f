//! Icon asset data model and plugin application engine
//!
//! Core of the iconforge pipeline:
//! - [`Asset`] / [`Flavor`] / [`Icon`]: the icon variant data model with
//!   lazy contents and manifest config projections
//! - [`prop_combinator`]: deterministic Cartesian expansion of iterant axes
//! - [`PluginManager`]: ordered fan-out/fan-in application of plugin
//!   chains, one invocation per property combination
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use iconforge_models::prelude::*;
//!
//! # async fn example(icon: Icon, minify: Plugin) -> Result<(), PipelineError> {
//! let item = PipelineItem::from(icon.assets()[0].clone());
//! let plugins = vec![minify.with_iterants(["theme"]).write_to_output(true)];
//!
//! let manager = PluginManager::new();
//! let flavors = manager.apply_plugins_on_asset(&item, &icon, &plugins).await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod asset;
pub mod content;
pub mod error;
pub mod files;
pub mod flavor;
pub mod icon;
pub mod interface;
pub mod item;
pub mod observer;
pub mod plugin_manager;
pub mod prop_combinator;

// Re-exports for convenience
pub use asset::{Asset, AssetConfig};
pub use content::Content;
pub use error::{AssetError, ConfigError, PersistenceError, PipelineError};
pub use flavor::Flavor;
pub use icon::{Icon, IconConfig, IterantDecl, IterantValue};
pub use interface::{Plugin, PluginFn, PluginOutput, PluginParams};
pub use item::{IconAsset, PipelineItem};
pub use observer::{PipelineEvent, PipelineObserver, TracingObserver};
pub use plugin_manager::{get_all_prop_combinations, PluginManager};
pub use prop_combinator::{prop_combinator, PropCombination};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and running icon pipelines
    pub use crate::{
        Asset, AssetConfig, Content, Flavor, Icon, IconAsset, IconConfig, IterantValue,
        PipelineError, PipelineItem, Plugin, PluginFn, PluginManager, PluginOutput, PluginParams,
        PropCombination,
    };
}

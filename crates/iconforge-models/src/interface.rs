//! Plugin contract
//!
//! A plugin is a named asynchronous transformation unit applied to pipeline
//! items, optionally parameterized by iterants declared on the owning icon.
//!
//! # Example
//!
//! ```rust,ignore
//! use iconforge_models::prelude::*;
//!
//! #[derive(Debug)]
//! struct Minify;
//!
//! #[async_trait::async_trait]
//! impl PluginFn for Minify {
//!     async fn run(
//!         &self,
//!         item: &PipelineItem,
//!         _icon: &Icon,
//!         _params: &PluginParams,
//!     ) -> anyhow::Result<PluginOutput> {
//!         Ok(PluginOutput::Single(item.clone()))
//!     }
//! }
//!
//! let plugin = Plugin::new("minify", Minify).write_to_output(true);
//! ```

use crate::icon::Icon;
use crate::item::PipelineItem;
use crate::prop_combinator::PropCombination;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// The transformation function a plugin supplies
///
/// Failures are returned as [`anyhow::Error`] and propagate to the pipeline
/// caller unmodified — the engine never retries or suppresses them.
#[async_trait]
pub trait PluginFn: Send + Sync {
    /// Transform one input item into one or more output items
    ///
    /// `params` carries the plugin's static parameters plus, when the
    /// plugin declares iterants, the property combination for this
    /// invocation.
    ///
    /// # Errors
    /// Any error the transformation raises; surfaced verbatim.
    async fn run(
        &self,
        item: &PipelineItem,
        icon: &Icon,
        params: &PluginParams,
    ) -> anyhow::Result<PluginOutput>;
}

/// What a plugin invocation produced
///
/// Single-item returns are normalized to one-element sequences before the
/// engine concatenates stage output.
#[derive(Debug, Clone)]
pub enum PluginOutput {
    /// Exactly one item
    Single(PipelineItem),
    /// Zero or more items, in production order
    Many(Vec<PipelineItem>),
}

impl PluginOutput {
    /// Normalize to a sequence
    #[must_use]
    pub fn into_items(self) -> Vec<PipelineItem> {
        match self {
            Self::Single(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl From<PipelineItem> for PluginOutput {
    fn from(item: PipelineItem) -> Self {
        Self::Single(item)
    }
}

impl From<crate::flavor::Flavor> for PluginOutput {
    fn from(flavor: crate::flavor::Flavor) -> Self {
        Self::Single(PipelineItem::Flavor(flavor))
    }
}

impl From<Vec<PipelineItem>> for PluginOutput {
    fn from(items: Vec<PipelineItem>) -> Self {
        Self::Many(items)
    }
}

/// Parameters handed to one plugin invocation
///
/// Immutable per invocation: the engine never mutates a shared bag across
/// combinations, it clones and merges via [`PluginParams::with_prop_combo`].
#[derive(Debug, Clone, Default)]
pub struct PluginParams {
    values: IndexMap<String, serde_json::Value>,
    prop_combo: Option<PropCombination>,
}

impl PluginParams {
    /// Empty parameter bag
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static parameter
    #[inline]
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up a static parameter
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// The property combination for this invocation, if the plugin iterates
    #[inline]
    #[must_use]
    pub fn prop_combo(&self) -> Option<&PropCombination> {
        self.prop_combo.as_ref()
    }

    /// Copy of this bag with the combination merged in
    ///
    /// The receiver is untouched, so no invocation ever observes another
    /// combination's merge.
    #[must_use]
    pub fn with_prop_combo(&self, combo: PropCombination) -> Self {
        Self {
            values: self.values.clone(),
            prop_combo: Some(combo),
        }
    }
}

/// A named transformation unit in a plugin chain
#[derive(Clone)]
pub struct Plugin {
    name: String,
    run: Arc<dyn PluginFn>,
    iterants: Option<Vec<String>>,
    params: PluginParams,
    write_to_output: bool,
}

impl Plugin {
    /// Create a plugin from a name and transformation function
    #[must_use]
    pub fn new(name: impl Into<String>, run: impl PluginFn + 'static) -> Self {
        Self {
            name: name.into(),
            run: Arc::new(run),
            iterants: None,
            params: PluginParams::new(),
            write_to_output: false,
        }
    }

    /// Declare the icon properties this plugin iterates over
    #[must_use]
    pub fn with_iterants<I, S>(mut self, iterants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.iterants = Some(iterants.into_iter().map(Into::into).collect());
        self
    }

    /// Set the static parameters merged into every invocation
    #[must_use]
    pub fn with_params(mut self, params: PluginParams) -> Self {
        self.params = params;
        self
    }

    /// Persist in-memory outputs to the icon's scratch directory
    #[must_use]
    pub fn write_to_output(mut self, write: bool) -> Self {
        self.write_to_output = write;
        self
    }

    /// Plugin name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared iterants, if any
    #[inline]
    #[must_use]
    pub fn iterants(&self) -> Option<&[String]> {
        self.iterants.as_deref()
    }

    /// Static parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &PluginParams {
        &self.params
    }

    /// Whether outputs are persisted to scratch
    #[inline]
    #[must_use]
    pub fn writes_to_output(&self) -> bool {
        self.write_to_output
    }

    /// Invoke the transformation function once
    ///
    /// # Errors
    /// Whatever the plugin function raises, verbatim.
    pub async fn invoke(
        &self,
        item: &PipelineItem,
        icon: &Icon,
        params: &PluginParams,
    ) -> anyhow::Result<PluginOutput> {
        self.run.run(item, icon, params).await
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("iterants", &self.iterants)
            .field("write_to_output", &self.write_to_output)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn with_prop_combo_leaves_receiver_untouched() {
        let base = PluginParams::new().with_value("optimize", true);

        let mut dark = PropCombination::new();
        dark.insert("theme", "dark".into());
        let merged = base.with_prop_combo(dark.clone());

        assert!(base.prop_combo().is_none());
        assert_eq!(merged.prop_combo(), Some(&dark));
        assert_eq!(merged.get("optimize"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn single_output_normalizes_to_one_element() {
        let dir = if cfg!(windows) { r"C:\icons\home" } else { "/icons/home" };
        let asset = crate::asset::Asset::new(
            dir,
            crate::asset::AssetConfig::from_path("./a.svg"),
        )
        .unwrap();
        let output = PluginOutput::from(PipelineItem::from(asset));
        assert_eq!(output.into_items().len(), 1);
    }
}

//! Plugin application engine
//!
//! Runs an ordered chain of plugins over one pipeline item. Each stage's
//! input set is the previous stage's flattened output set; within a stage,
//! a plugin that declares iterants is invoked once per property combination
//! in combinator order. The fold is strictly sequential, so output ordering
//! is deterministic end to end.
//!
//! Failure anywhere — a missing iterant, a plugin error, a scratch write —
//! aborts the remaining stages for this item and surfaces to the caller
//! with the originating cause intact.

use crate::error::{ConfigError, PersistenceError, PipelineError};
use crate::files;
use crate::icon::Icon;
use crate::interface::Plugin;
use crate::item::{IconAsset, PipelineItem};
use crate::observer::{PipelineEvent, PipelineObserver, TracingObserver};
use crate::prop_combinator::{prop_combinator, PropCombination};
use futures::future;
use indexmap::IndexMap;
use std::sync::Arc;

/// Scratch subdirectory of the icon path for `write_to_output` persistence
const SCRATCH_DIR: &str = "tmp";
/// Format persisted outputs are written in
const SCRATCH_FORMAT: &str = "svg";

/// Applies plugin chains to pipeline items
///
/// Holds only the injected observer; all pipeline state lives on the stack
/// of one `apply_plugins_on_asset` call, so a failing run for one asset
/// cannot corrupt a sibling's.
#[derive(Debug, Clone)]
pub struct PluginManager {
    observer: Arc<dyn PipelineObserver>,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    /// Engine with the default `tracing`-backed observer
    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
        }
    }

    /// Engine reporting to the given event sink
    #[must_use]
    pub fn with_observer(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }

    /// Apply a plugin chain to one item, left to right
    ///
    /// Stage 0 consumes the singleton `[item]`; stage *i* consumes the full
    /// flattened output of stage *i-1*, order preserved. Returns the
    /// flattened output of the last plugin.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyPluginChain`] if `plugins` is empty
    /// - any failure from [`Self::apply_single_plugin_on_asset`], which
    ///   aborts the remaining stages
    pub async fn apply_plugins_on_asset(
        &self,
        item: &PipelineItem,
        icon: &Icon,
        plugins: &[Plugin],
    ) -> Result<Vec<PipelineItem>, PipelineError> {
        if plugins.is_empty() {
            return Err(ConfigError::EmptyPluginChain.into());
        }

        let mut current = vec![item.clone()];
        for (stage, plugin) in plugins.iter().enumerate() {
            self.observer.on_event(&PipelineEvent::StageStarted {
                stage,
                plugin: plugin.name().to_string(),
                inputs: current.len(),
            });
            tracing::debug!(
                plugin = plugin.name(),
                stage,
                inputs = current.len(),
                "applying plugin"
            );

            let mut next = Vec::new();
            for input in &current {
                match self.apply_single_plugin_on_asset(input, icon, plugin).await {
                    Ok(produced) => next.extend(produced),
                    Err(err) => {
                        self.observer.on_event(&PipelineEvent::StageFailed {
                            stage,
                            plugin: plugin.name().to_string(),
                        });
                        return Err(err);
                    }
                }
            }

            self.observer.on_event(&PipelineEvent::StageCompleted {
                stage,
                plugin: plugin.name().to_string(),
                outputs: next.len(),
            });
            current = next;
        }

        Ok(current)
    }

    /// Apply one plugin to one item
    ///
    /// With iterants declared, every name is resolved against the icon
    /// before any invocation; the plugin then runs once per property
    /// combination, in combinator order, with a per-invocation copy of its
    /// params. Without iterants it runs exactly once. When
    /// `write_to_output` is set, every output item holding in-memory
    /// contents is persisted to the icon's scratch directory and all writes
    /// are awaited before returning.
    ///
    /// # Errors
    /// - [`ConfigError::MissingIterant`] before any invocation
    /// - [`PipelineError::PluginExecution`] carrying a plugin failure
    ///   verbatim
    /// - [`PersistenceError`] if any scratch write fails
    pub async fn apply_single_plugin_on_asset(
        &self,
        item: &PipelineItem,
        icon: &Icon,
        plugin: &Plugin,
    ) -> Result<Vec<PipelineItem>, PipelineError> {
        let mut output = Vec::new();

        match plugin.iterants() {
            Some(iterants) if !iterants.is_empty() => {
                let combos = get_all_prop_combinations(icon, iterants)?;
                for combo in combos {
                    let params = plugin.params().with_prop_combo(combo.clone());
                    self.observer.on_event(&PipelineEvent::PluginInvoked {
                        plugin: plugin.name().to_string(),
                        item: item.name().to_string(),
                        combo: Some(combo.clone()),
                    });
                    let produced = plugin.invoke(item, icon, &params).await.map_err(|error| {
                        PipelineError::PluginExecution {
                            plugin: plugin.name().to_string(),
                            item: item.name().to_string(),
                            error,
                        }
                    })?;
                    output.extend(
                        produced
                            .into_items()
                            .into_iter()
                            .map(|out| out.stamp_combo(&combo)),
                    );
                }
            }
            _ => {
                self.observer.on_event(&PipelineEvent::PluginInvoked {
                    plugin: plugin.name().to_string(),
                    item: item.name().to_string(),
                    combo: None,
                });
                let produced = plugin.invoke(item, icon, plugin.params()).await.map_err(
                    |error| PipelineError::PluginExecution {
                        plugin: plugin.name().to_string(),
                        item: item.name().to_string(),
                        error,
                    },
                )?;
                output.extend(produced.into_items());
            }
        }

        if plugin.writes_to_output() {
            self.persist_outputs(icon, &output).await?;
        }

        Ok(output)
    }

    /// Write every in-memory output to `{icon_path}/tmp/{name}.svg`
    ///
    /// Writes fan out independently and are joined; the first failure fails
    /// the stage. Items without loaded contents are skipped — persistence
    /// never triggers a lazy disk read.
    async fn persist_outputs(
        &self,
        icon: &Icon,
        output: &[PipelineItem],
    ) -> Result<(), PersistenceError> {
        let scratch = icon.icon_path().join(SCRATCH_DIR);
        let writes = output.iter().filter_map(|out| {
            out.in_memory_contents().map(|contents| {
                let name = out.name().to_string();
                let dir = scratch.clone();
                async move {
                    match files::save_content_to_file(&dir, &name, contents, SCRATCH_FORMAT).await
                    {
                        Ok(path) => Ok((name, path)),
                        Err(source) => Err(PersistenceError { name, dir, source }),
                    }
                }
            })
        });

        let written = future::try_join_all(writes).await?;
        for (name, path) in written {
            self.observer
                .on_event(&PipelineEvent::ContentPersisted { name, path });
        }
        Ok(())
    }
}

/// Resolve a plugin's iterants against the icon and expand the product
///
/// Every name is checked before any combination is built, so a missing
/// iterant fails the whole application up front.
///
/// # Errors
/// [`ConfigError::MissingIterant`] naming the first undeclared iterant.
pub fn get_all_prop_combinations(
    icon: &Icon,
    iterants: &[String],
) -> Result<Vec<PropCombination>, ConfigError> {
    let mut props = IndexMap::new();
    for iterant in iterants {
        let values = icon
            .iterant_values(iterant)
            .ok_or_else(|| ConfigError::MissingIterant {
                iterant: iterant.clone(),
                icon_name: icon.icon_name().to_string(),
            })?;
        props.insert(iterant.clone(), values);
    }
    Ok(prop_combinator(&props))
}

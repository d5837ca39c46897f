//! Pipeline observability
//!
//! The engine reports progress through an injected [`PipelineObserver`]
//! rather than a process-wide logger, so callers can collect structured
//! events per run. The default observer forwards everything to `tracing`.

use crate::prop_combinator::PropCombination;
use std::fmt::Debug;
use std::path::PathBuf;

/// Structured events emitted while a plugin chain runs
///
/// Stage events mirror the per-asset state machine: each stage starts,
/// then either completes or fails; a failed stage terminates the run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A stage began processing its input set
    StageStarted {
        /// Zero-based stage index
        stage: usize,
        /// Plugin driving this stage
        plugin: String,
        /// Number of input items
        inputs: usize,
    },
    /// The plugin function is about to run once
    PluginInvoked {
        /// Plugin name
        plugin: String,
        /// Input item name
        item: String,
        /// Property combination for this invocation, if iterating
        combo: Option<PropCombination>,
    },
    /// A stage finished; its flattened output feeds the next stage
    StageCompleted {
        /// Zero-based stage index
        stage: usize,
        /// Plugin that drove this stage
        plugin: String,
        /// Number of output items
        outputs: usize,
    },
    /// A stage failed; the run is aborted
    StageFailed {
        /// Zero-based stage index
        stage: usize,
        /// Plugin that drove this stage
        plugin: String,
    },
    /// An in-memory output was written to the scratch directory
    ContentPersisted {
        /// Output item name
        name: String,
        /// Path written
        path: PathBuf,
    },
}

/// Structured event sink injected into the engine
pub trait PipelineObserver: Send + Sync + Debug {
    /// Receive one event
    fn on_event(&self, event: &PipelineEvent);
}

/// Default observer: forwards events to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage, plugin, inputs } => {
                tracing::debug!(stage = *stage, plugin = %plugin, inputs = *inputs, "stage started");
            }
            PipelineEvent::PluginInvoked { plugin, item, combo } => {
                tracing::debug!(plugin = %plugin, item = %item, combo = ?combo, "invoking plugin");
            }
            PipelineEvent::StageCompleted { stage, plugin, outputs } => {
                tracing::debug!(stage = *stage, plugin = %plugin, outputs = *outputs, "stage completed");
            }
            PipelineEvent::StageFailed { stage, plugin } => {
                tracing::warn!(stage = *stage, plugin = %plugin, "stage failed");
            }
            PipelineEvent::ContentPersisted { name, path } => {
                tracing::debug!(name = %name, path = %path.display(), "content persisted");
            }
        }
    }
}

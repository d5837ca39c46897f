//! Testing utilities for the iconforge workspace
//!
//! Shared fixtures: on-disk icons, canned plugins, and a recording
//! observer.

#![allow(missing_docs)]

use async_trait::async_trait;
use iconforge_models::{
    AssetConfig, Flavor, Icon, IconAsset, IconConfig, IterantDecl, IterantValue, PipelineEvent,
    PipelineItem, PipelineObserver, Plugin, PluginFn, PluginOutput, PluginParams,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Initialize tracing from `RUST_LOG` for test debugging; safe to call
/// repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A temp-dir-backed icon with one `filled.svg` source asset.
pub struct IconFixture {
    /// Keeps the directory alive for the test's duration.
    pub dir: TempDir,
    pub icon: Icon,
}

/// Build an icon on disk with the given theme iterant values.
pub fn themed_icon(icon_name: &str, themes: &[&str]) -> IconFixture {
    let dir = tempfile::tempdir().expect("create temp icon dir");
    std::fs::write(dir.path().join("filled.svg"), "<svg/>").expect("write source asset");

    let mut config = IconConfig {
        icon_name: icon_name.to_string(),
        ..IconConfig::default()
    };
    config.iterants.insert(
        "theme".to_string(),
        IterantDecl::Many(themes.iter().map(|t| IterantValue::from(*t)).collect()),
    );
    config.assets.push(AssetConfig::from_path("./filled.svg"));

    let icon = Icon::new(dir.path(), config).expect("build icon fixture");
    IconFixture { dir, icon }
}

/// First source asset of an icon, wrapped as a pipeline item.
pub fn source_item(icon: &Icon) -> PipelineItem {
    PipelineItem::from(icon.assets()[0].clone())
}

/// Plugin fn that passes its input through and counts invocations.
#[derive(Debug)]
pub struct CountingFn {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PluginFn for CountingFn {
    async fn run(
        &self,
        item: &PipelineItem,
        _icon: &Icon,
        _params: &PluginParams,
    ) -> anyhow::Result<PluginOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PluginOutput::Single(item.clone()))
    }
}

/// Pass-through plugin that counts how often its fn ran.
pub fn counting_plugin(name: &str, calls: Arc<AtomicUsize>) -> Plugin {
    Plugin::new(name, CountingFn { calls })
}

/// Plugin fn producing `n` flavors named `{input}_{i}`, with in-memory
/// contents.
#[derive(Debug)]
pub struct FanOutFn {
    pub n: usize,
}

#[async_trait]
impl PluginFn for FanOutFn {
    async fn run(
        &self,
        item: &PipelineItem,
        icon: &Icon,
        _params: &PluginParams,
    ) -> anyhow::Result<PluginOutput> {
        let mut items = Vec::with_capacity(self.n);
        for i in 0..self.n {
            let name = format!("{}_{i}", item.name());
            let config = AssetConfig::from_path(format!("./{name}.svg"))
                .with_name(name.clone())
                .with_contents(format!("<svg id=\"{name}\"/>"));
            items.push(PipelineItem::from(Flavor::new(icon.icon_path(), config)?));
        }
        Ok(PluginOutput::Many(items))
    }
}

/// Plugin producing `n` named flavors per input.
pub fn fan_out_plugin(name: &str, n: usize) -> Plugin {
    Plugin::new(name, FanOutFn { n })
}

/// Plugin fn producing one flavor named `{icon_name}_{theme}` per
/// invocation, from the `theme` value in the property combination.
#[derive(Debug)]
pub struct ThemeFlavorFn;

#[async_trait]
impl PluginFn for ThemeFlavorFn {
    async fn run(
        &self,
        _item: &PipelineItem,
        icon: &Icon,
        params: &PluginParams,
    ) -> anyhow::Result<PluginOutput> {
        let combo = params
            .prop_combo()
            .ok_or_else(|| anyhow::anyhow!("theme plugin invoked without a combination"))?;
        let theme = combo
            .get("theme")
            .ok_or_else(|| anyhow::anyhow!("combination is missing a theme"))?;

        let name = format!("{}_{theme}", icon.icon_name());
        let config = AssetConfig::from_path(format!("./{name}.svg"))
            .with_name(name.clone())
            .with_contents(format!("<svg data-theme=\"{theme}\"/>"));
        Ok(PluginOutput::from(Flavor::new(icon.icon_path(), config)?))
    }
}

/// Theme-expanding plugin; pair with `.with_iterants(["theme"])`.
pub fn theme_flavor_plugin(name: &str) -> Plugin {
    Plugin::new(name, ThemeFlavorFn).with_iterants(["theme"])
}

/// Plugin fn that always fails with the given message.
#[derive(Debug)]
pub struct FailingFn {
    pub message: String,
}

#[async_trait]
impl PluginFn for FailingFn {
    async fn run(
        &self,
        _item: &PipelineItem,
        _icon: &Icon,
        _params: &PluginParams,
    ) -> anyhow::Result<PluginOutput> {
        Err(anyhow::anyhow!("{}", self.message))
    }
}

/// Plugin whose fn always fails.
pub fn failing_plugin(name: &str, message: &str) -> Plugin {
    Plugin::new(
        name,
        FailingFn {
            message: message.to_string(),
        },
    )
}

/// Observer that records every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of events seen so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().expect("observer lock").clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().expect("observer lock").push(event.clone());
    }
}

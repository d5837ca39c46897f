//! End-to-end tests for the plugin application engine: chaining,
//! combinatorial expansion, ordering, persistence side effects and failure
//! propagation.

use iconforge_models::{
    ConfigError, IconAsset, PipelineError, PipelineEvent, PluginManager,
};
use iconforge_test_utils::{
    counting_plugin, failing_plugin, fan_out_plugin, init_tracing, source_item,
    theme_flavor_plugin, themed_icon, RecordingObserver,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn plugin_without_iterants_runs_exactly_once() {
    init_tracing();
    let fixture = themed_icon("home", &["light", "dark"]);
    let calls = Arc::new(AtomicUsize::new(0));
    let plugins = vec![counting_plugin("pass-through", Arc::clone(&calls))];

    let output = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.len(), 1);
}

#[tokio::test]
async fn stage_output_feeds_next_stage() {
    let fixture = themed_icon("home", &["light"]);
    // P1 doubles, P2 maps one-to-one: 1 -> 2 -> 2.
    let plugins = vec![fan_out_plugin("double", 2), fan_out_plugin("map", 1)];

    let output = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    let names: Vec<&str> = output.iter().map(IconAsset::name).collect();
    assert_eq!(names, vec!["filled_0_0", "filled_1_0"]);
}

#[tokio::test]
async fn iterant_expansion_preserves_combination_order() {
    let fixture = themed_icon("home", &["light", "dark", "dim"]);
    let plugins = vec![theme_flavor_plugin("themer")];

    let output = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    let names: Vec<&str> = output.iter().map(IconAsset::name).collect();
    assert_eq!(names, vec!["home_light", "home_dark", "home_dim"]);
}

#[tokio::test]
async fn flavors_carry_their_producing_combination() {
    let fixture = themed_icon("home", &["light", "dark"]);
    let plugins = vec![theme_flavor_plugin("themer")];

    let output = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    for (item, theme) in output.iter().zip(["light", "dark"]) {
        let combo = item.as_flavor().unwrap().combo().unwrap();
        assert_eq!(combo.get("theme").unwrap().to_string(), theme);
    }
}

#[tokio::test]
async fn missing_iterant_fails_before_any_invocation() {
    let fixture = themed_icon("home", &["light"]);
    let calls = Arc::new(AtomicUsize::new(0));
    let plugins =
        vec![counting_plugin("pass-through", Arc::clone(&calls)).with_iterants(["resolution"])];

    let err = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::MissingIterant { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Could not find resolution in the config file of home"
    );
}

#[tokio::test]
async fn empty_plugin_chain_is_rejected() {
    let fixture = themed_icon("home", &["light"]);

    let err = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &[])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::EmptyPluginChain)
    ));
}

#[tokio::test]
async fn write_to_output_persists_in_memory_flavors() {
    let fixture = themed_icon("home", &["light", "dark"]);
    let plugins = vec![theme_flavor_plugin("themer").write_to_output(true)];

    PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    let scratch = fixture.dir.path().join("tmp");
    for theme in ["light", "dark"] {
        let written = scratch.join(format!("home_{theme}.svg"));
        let body = tokio::fs::read_to_string(&written).await.unwrap();
        assert_eq!(body, format!("<svg data-theme=\"{theme}\"/>"));
    }
}

#[tokio::test]
async fn write_to_output_skips_items_without_loaded_contents() {
    let fixture = themed_icon("home", &["light"]);
    let calls = Arc::new(AtomicUsize::new(0));
    // Pass-through output is the source asset, whose contents were never
    // loaded into memory.
    let plugins = vec![counting_plugin("pass-through", calls).write_to_output(true)];

    PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    assert!(!fixture.dir.path().join("tmp").exists());
}

#[tokio::test]
async fn failing_scratch_write_fails_the_stage() {
    let fixture = themed_icon("home", &["light", "dark"]);
    // A regular file where the scratch directory must go makes every
    // persistence write fail.
    std::fs::write(fixture.dir.path().join("tmp"), "not a directory").unwrap();

    let observer = RecordingObserver::new();
    let manager = PluginManager::with_observer(observer.clone());
    let plugins = vec![theme_flavor_plugin("themer").write_to_output(true)];

    let err = manager
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Persistence(_)));
    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PipelineEvent::StageFailed { stage: 0, .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::StageCompleted { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::ContentPersisted { .. })));
}

#[tokio::test]
async fn plugin_failure_propagates_with_original_message() {
    let fixture = themed_icon("home", &["light"]);
    let calls = Arc::new(AtomicUsize::new(0));
    let plugins = vec![
        fan_out_plugin("double", 2),
        failing_plugin("broken", "stroke width out of range"),
        counting_plugin("never-reached", Arc::clone(&calls)),
    ];

    let err = PluginManager::new()
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap_err();

    assert!(err.is_plugin_failure());
    assert!(err.to_string().contains("stroke width out of range"));
    assert!(err.to_string().contains("broken"));
    // Later stages never run.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn observer_sees_stage_lifecycle() {
    let fixture = themed_icon("home", &["light", "dark"]);
    let observer = RecordingObserver::new();
    let manager = PluginManager::with_observer(observer.clone());
    let plugins = vec![theme_flavor_plugin("themer"), fan_out_plugin("map", 1)];

    manager
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    let events = observer.events();
    let started: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageStarted { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![0, 1]);

    let completed: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageCompleted { stage, outputs, .. } => Some((*stage, *outputs)),
            _ => None,
        })
        .collect();
    // Stage 0 fans one asset out to two themes; stage 1 maps one-to-one.
    assert_eq!(completed, vec![(0, 2), (1, 2)]);

    let invocations = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::PluginInvoked { .. }))
        .count();
    // 2 themed invocations + 2 map invocations.
    assert_eq!(invocations, 4);
}

#[tokio::test]
async fn observer_sees_failure_and_nothing_after() {
    let fixture = themed_icon("home", &["light"]);
    let observer = RecordingObserver::new();
    let manager = PluginManager::with_observer(observer.clone());
    let plugins = vec![
        failing_plugin("broken", "boom"),
        fan_out_plugin("never-reached", 2),
    ];

    manager
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap_err();

    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PipelineEvent::StageFailed { stage: 0, .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::StageCompleted { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::StageStarted { stage: 1, .. })));
}

#[tokio::test]
async fn persisted_outputs_are_reported_to_the_observer() {
    let fixture = themed_icon("home", &["light"]);
    let observer = RecordingObserver::new();
    let manager = PluginManager::with_observer(observer.clone());
    let plugins = vec![theme_flavor_plugin("themer").write_to_output(true)];

    manager
        .apply_plugins_on_asset(&source_item(&fixture.icon), &fixture.icon, &plugins)
        .await
        .unwrap();

    let persisted: Vec<String> = observer
        .events()
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::ContentPersisted { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(persisted, vec!["home_light".to_string()]);
}

//! Scope binding manager tests
//! Run with: cargo test --test scope_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use carik_admin::application::services::{PluginLifecycleManager, ScopeBindingManager};
use carik_admin::domain::entities::PluginDescriptor;
use carik_admin::domain::traits::BotProfile;
use carik_admin::infrastructure::host::InMemoryPluginHost;
use carik_admin::infrastructure::storage::InMemoryProfileStore;
use common::{ensure_init, names, runner, MockProfile};

fn scope() -> ScopeBindingManager {
    ensure_init();
    ScopeBindingManager::new(runner(2_000))
}

#[tokio::test]
async fn test_enable_success_and_failure() {
    let profile = MockProfile::new("10001").failing("weather", "plugin weather is not mounted");
    let report = scope().enable(&profile, &names(&["rss", "weather"])).await;

    assert_eq!(report.get("rss"), Some("plugin enable success"));
    assert_eq!(report.get("weather"), Some("plugin enable failure, plugin weather is not mounted"));
    assert_eq!(profile.calls(), vec!["enable rss", "enable weather"]);
}

#[tokio::test]
async fn test_disable_in_request_order() {
    let profile = MockProfile::new("10001").with_enabled(&["a", "b", "c"]);
    let report = scope().disable(&profile, &names(&["c", "a", "b"])).await;

    assert_eq!(report.len(), 3);
    assert_eq!(report.get("a"), Some("plugin disable success"));
    assert_eq!(profile.calls(), vec!["disable c", "disable a", "disable b"]);
    assert!(profile.enabled_plugins().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_apply_and_exempt_set_option() {
    let profile = MockProfile::new("10001").with_enabled(&["rss"]);
    let scope = scope();

    let exempt = scope.exempt_server(&profile, "group-1", &names(&["rss"])).await;
    let apply = scope.apply_server(&profile, "group-1", &names(&["rss"])).await;

    assert_eq!(exempt.get("rss"), Some("group server exempt success"));
    assert_eq!(apply.get("rss"), Some("group server apply success"));
    assert_eq!(profile.calls(), vec!["group-1 rss apply=false", "group-1 rss apply=true"]);
}

#[tokio::test]
async fn test_apply_failure_passes_message_through() {
    let profile = MockProfile::new("10001").failing("rss", "plugin rss is not enabled for bot 10001");
    let report = scope().apply_server(&profile, "group-1", &names(&["rss"])).await;

    assert_eq!(
        report.get("rss"),
        Some("group server apply failure, plugin rss is not enabled for bot 10001")
    );
}

#[tokio::test]
async fn test_duplicate_names_bound_once() {
    let profile = MockProfile::new("10001");
    let report = scope().enable(&profile, &names(&["rss", "rss"])).await;

    assert_eq!(report.len(), 1);
    assert_eq!(profile.calls(), vec!["enable rss"]);
}

#[tokio::test]
async fn test_enable_requires_mounted_plugin_end_to_end() {
    ensure_init();
    let host = Arc::new(InMemoryPluginHost::new(
        vec![PluginDescriptor::local("greeting"), PluginDescriptor::local("rss")],
        Duration::ZERO,
    ));
    let runner = runner(2_000);
    let lifecycle = PluginLifecycleManager::new(host.clone(), runner.clone());
    let scope = ScopeBindingManager::new(runner);
    let profile = InMemoryProfileStore::new("10001", host.clone(), true);
    profile.join_group("group-1").await;

    lifecycle.mount(&names(&["greeting"])).await.unwrap();
    let report = scope.enable(&profile, &names(&["greeting", "rss"])).await;

    assert_eq!(report.get("greeting"), Some("plugin enable success"));
    assert_eq!(report.get("rss"), Some("plugin enable failure, plugin rss is not mounted"));

    let exempt = scope.exempt_server(&profile, "group-1", &names(&["greeting"])).await;
    assert_eq!(exempt.get("greeting"), Some("group server exempt success"));

    let setting = profile.group_setting("group-1").await.unwrap();
    assert_eq!(setting.len(), 1);
    assert!(!setting["greeting"].apply);
}

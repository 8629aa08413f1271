//! Bootstrap integration: config and cluster-state files driving the
//! controller end to end.

use limitgate::{ClusterState, LimitgateConfig};
use limitgate_engine::Controller;
use limitgate_model::ENFORCEMENT_NAME;
use limitgate_store::ObjectStore;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
policy_name = "global-limits"
resync_interval_secs = 60
max_parallel = 4
pass_timeout_secs = 10
log_level = "warn"
"#;

const STATE: &str = r#"
namespaces = ["team-a", "team-b", "kube-system"]

[policy]
name = "global-limits"
excludeNamespaces = ["kube-system"]

[[policy.limits]]
type = "Container"

[policy.limits.default]
cpu = "500m"
memory = "512Mi"

[policy.limits.max]
memory = "2Gi"
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn state_file_drives_a_full_convergence_pass() {
    let config_file = write_temp(CONFIG);
    let state_file = write_temp(STATE);

    let config = LimitgateConfig::from_toml_file(config_file.path()).unwrap();
    let state = ClusterState::from_toml_file(state_file.path()).unwrap();
    let store = state.into_store().await;

    let controller =
        Controller::new(Arc::new(store.clone()), config.controller_settings()).unwrap();
    let outcome = controller.reconcile().await.unwrap();

    assert_eq!(outcome.stats().created, 2);
    assert!(outcome.stats().is_clean());

    let a = store
        .get_enforcement("team-a", ENFORCEMENT_NAME)
        .await
        .unwrap();
    assert!(a.is_owned());
    assert_eq!(a.limits[0].default["cpu"].millis(), 500);
    assert_eq!(
        a.limits[0].max["memory"].millis(),
        2 * 1_024_i128.pow(3) * 1_000
    );
    assert!(store
        .get_enforcement("kube-system", ENFORCEMENT_NAME)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn second_reconcile_performs_no_writes() {
    let state_file = write_temp(STATE);
    let state = ClusterState::from_toml_file(state_file.path()).unwrap();
    let store = state.into_store().await;

    let controller = Controller::new(
        Arc::new(store.clone()),
        LimitgateConfig::default().controller_settings(),
    )
    .unwrap();

    controller.reconcile().await.unwrap();
    let writes_after_first = store.write_count();

    let outcome = controller.reconcile().await.unwrap();
    assert_eq!(outcome.stats().writes(), 0);
    assert_eq!(store.write_count(), writes_after_first);
}

#[tokio::test]
async fn reconcile_without_policy_sweeps_owned_objects() {
    let state_file = write_temp(STATE);
    let state = ClusterState::from_toml_file(state_file.path()).unwrap();
    let store = state.into_store().await;

    let controller = Controller::new(
        Arc::new(store.clone()),
        LimitgateConfig::default().controller_settings(),
    )
    .unwrap();
    controller.reconcile().await.unwrap();

    store.remove_policy("global-limits").await;
    let outcome = controller.reconcile().await.unwrap();

    assert_eq!(outcome.stats().deleted, 2);
    assert!(store.list_enforcements(None).await.unwrap().is_empty());
}

#[test]
fn malformed_state_file_is_rejected() {
    let file = write_temp("namespaces = \"not-a-list\"");
    assert!(ClusterState::from_toml_file(file.path()).is_err());
}

//! End-to-end loading through the public API

use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use treew_config::{ConcurrencyPolicy, ConfigProvider, FileDiscovery};

#[test]
#[serial]
fn test_full_settings_file_round_trips_into_settings() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    fs::write(
        project.path().join("treew.yml"),
        r#"
baseline: 65536.0
gap: 65536.0
min_gap: 0.5
persist_timeout_ms: 1500
concurrency: reject
"#,
    )
    .unwrap();

    let provider = ConfigProvider::with_discovery(FileDiscovery::with_dirs(
        Some(project.path().to_path_buf()),
        Some(global.path().to_path_buf()),
    ));
    let settings = provider.load().unwrap();

    assert_eq!(settings.baseline, 65536.0);
    assert_eq!(settings.gap, 65536.0);
    assert_eq!(settings.min_gap, 0.5);
    assert_eq!(settings.persist_timeout().as_millis(), 1500);
    assert_eq!(settings.concurrency, ConcurrencyPolicy::Reject);
}

#[test]
#[serial]
fn test_env_number_override() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    std::env::set_var("TREEW_PERSIST_TIMEOUT_MS", "250");
    let result = ConfigProvider::with_discovery(FileDiscovery::with_dirs(
        Some(project.path().to_path_buf()),
        Some(global.path().to_path_buf()),
    ))
    .load();
    std::env::remove_var("TREEW_PERSIST_TIMEOUT_MS");

    assert_eq!(result.unwrap().persist_timeout_ms, 250);
}

//! Tests for configuration precedence order

use crate::{ConcurrencyPolicy, ConfigError, ConfigProvider, FileDiscovery, ReorderSettings};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn provider_for(project: &TempDir, global: &TempDir) -> ConfigProvider {
    ConfigProvider::with_discovery(FileDiscovery::with_dirs(
        Some(project.path().to_path_buf()),
        Some(global.path().to_path_buf()),
    ))
}

#[test]
#[serial]
fn test_defaults_without_sources() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    let settings = provider_for(&project, &global).load().unwrap();
    assert_eq!(settings, ReorderSettings::default());
}

#[test]
#[serial]
fn test_project_overrides_global() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    fs::write(
        global.path().join("treew.toml"),
        "gap = 500.0\nbaseline = 250.0\n",
    )
    .unwrap();
    fs::write(project.path().join("treew.yaml"), "gap: 800.0\n").unwrap();

    let settings = provider_for(&project, &global).load().unwrap();
    assert_eq!(settings.gap, 800.0);
    // Global-only value survives the merge
    assert_eq!(settings.baseline, 250.0);
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    fs::write(
        project.path().join("treew.json"),
        r#"{"concurrency": "queue", "persist_timeout_ms": 2000}"#,
    )
    .unwrap();

    std::env::set_var("TREEW_CONCURRENCY", "reject");
    let result = provider_for(&project, &global).load();
    std::env::remove_var("TREEW_CONCURRENCY");

    let settings = result.unwrap();
    assert_eq!(settings.concurrency, ConcurrencyPolicy::Reject);
    assert_eq!(settings.persist_timeout_ms, 2000);
}

#[test]
#[serial]
fn test_invalid_file_values_fail_validation() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    fs::write(
        project.path().join("treew.toml"),
        "gap = 10.0\nmin_gap = 20.0\n",
    )
    .unwrap();

    let err = provider_for(&project, &global).load().unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

#[test]
#[serial]
fn test_malformed_file_is_parse_error() {
    let project = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();

    fs::write(project.path().join("treew.toml"), "gap = \"wide\"\n").unwrap();

    let err = provider_for(&project, &global).load().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

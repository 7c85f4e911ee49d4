//! Configuration resolution and graceful degradation
//!
//! Tests that manipulate SHELF_* environment variables are marked #[serial]
//! so they never race each other.

use serial_test::serial;
use shelf_common::config::{
    config_file_path, TomlConfig, CONFIG_ENV_VAR, DATABASE_ENV_VAR, PORT_ENV_VAR,
};
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_ENV_VAR);
    env::remove_var(DATABASE_ENV_VAR);
    env::remove_var(PORT_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_uses_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let config = TomlConfig::resolve(Some(&missing)).unwrap();

    assert_eq!(config.port, 5730);
    assert_eq!(config.feed.page_size, 100);
}

#[test]
#[serial]
fn test_file_values_loaded() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        database_path = "/tmp/shelf-test.db"

        [logging]
        level = "debug"

        [feed]
        page_delay_ms = 0
        max_retries = 1
        "#,
    )
    .unwrap();

    let config = TomlConfig::resolve(Some(&path)).unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/tmp/shelf-test.db")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.feed.page_delay_ms, 0);
    assert_eq!(config.feed.max_retries, 1);
    assert_eq!(config.feed.page_size, 100);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "database_path = \"/from/file.db\"\nport = 6000\n").unwrap();

    env::set_var(DATABASE_ENV_VAR, "/from/env.db");
    env::set_var(PORT_ENV_VAR, "7000");

    let config = TomlConfig::resolve(Some(&path)).unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/from/env.db")));
    assert_eq!(config.port, 7000);

    clear_env();
}

#[test]
#[serial]
fn test_bad_port_env_is_error() {
    clear_env();
    env::set_var(PORT_ENV_VAR, "eighty");

    let dir = TempDir::new().unwrap();
    let result = TomlConfig::resolve(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());

    clear_env();
}

#[test]
#[serial]
fn test_config_path_priority() {
    clear_env();
    env::set_var(CONFIG_ENV_VAR, "/etc/shelf/env.toml");

    let cli = PathBuf::from("/cli/config.toml");
    assert_eq!(config_file_path(Some(&cli)), Some(cli.clone()));
    assert_eq!(
        config_file_path(None),
        Some(PathBuf::from("/etc/shelf/env.toml"))
    );

    clear_env();
}

#[test]
#[serial]
fn test_malformed_file_is_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[feed\npage_size = ").unwrap();

    assert!(TomlConfig::resolve(Some(&path)).is_err());
}

//! Source precedence: CLI > environment > file > defaults.
//!
//! Environment-variable tests mutate process-global state and are
//! serialized with `serial_test`.

use std::fs;

use devserve_config::{ConfigOverrides, ServerConfig};
use serial_test::serial;
use tempfile::TempDir;

fn with_env<F: FnOnce()>(key: &str, value: &str, f: F) {
    std::env::set_var(key, value);
    f();
    std::env::remove_var(key);
}

#[test]
#[serial]
fn env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("devserve.toml");
    fs::write(&path, "port = 4000\n").unwrap();

    with_env("DEVSERVE_PORT", "5000", || {
        let config = ServerConfig::load(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 5000);
    });
}

#[test]
#[serial]
fn cli_overrides_env() {
    with_env("DEVSERVE_PORT", "5000", || {
        let overrides = ConfigOverrides {
            port: Some(6000),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::load(None, &overrides).unwrap();
        assert_eq!(config.port, 6000);
    });
}

#[test]
#[serial]
fn env_sets_string_and_duration_fields() {
    with_env("DEVSERVE_HOST", "0.0.0.0", || {
        with_env("DEVSERVE_DEBOUNCE_MS", "350", || {
            let config = ServerConfig::load(None, &ConfigOverrides::default()).unwrap();
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.debounce_ms, 350);
        });
    });
}

#[test]
#[serial]
fn file_still_applies_under_env_noise() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("devserve.yaml");
    fs::write(&path, "command: cargo run\ndebounce_ms: 150\n").unwrap();

    with_env("DEVSERVE_PORT", "5000", || {
        let config = ServerConfig::load(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.command.as_deref(), Some("cargo run"));
        assert_eq!(config.debounce_ms, 150);
    });
}

//! Default values of the merged configuration.

use devserve_config::{ConfigOverrides, ServerConfig};

#[test]
fn defaults_match_documented_surface() {
    let config = ServerConfig::load(None, &ConfigOverrides::default()).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8000);
    assert!(config.command.is_none());
    assert!(config.watch_directories.is_empty());
    assert!(config.static_dir.is_none());
    assert_eq!(config.debounce_ms, 200);
    assert_eq!(config.grace_period_ms, 5000);
    assert!(config.env.is_empty());
    assert!(config.include.is_empty());
}

#[test]
fn default_ignore_covers_common_noise() {
    let config = ServerConfig::default();

    for pattern in [".git", "node_modules", "target", "__pycache__", "*.log"] {
        assert!(
            config.ignore.iter().any(|p| p == pattern),
            "missing default ignore pattern: {pattern}"
        );
    }
}

#[test]
fn config_round_trips_through_toml() {
    let config = ServerConfig {
        command: Some("npm start".to_string()),
        watch_directories: vec!["src".into(), "public".into()],
        ..ServerConfig::default()
    };

    let serialized = toml::to_string(&config).unwrap();
    let parsed: ServerConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(parsed, config);
}

//! Integration tests for configuration loading

use std::time::Duration;
use tempfile::TempDir;
use xcsh::config::ConfigLoader;
use xcsh::error::ShellError;

#[test]
fn test_config_file_overrides_completion_policy() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("xcsh.toml");
    std::fs::write(
        &config_file,
        r#"
[api]
url = "https://acme.console.ves.volterra.io/api"
token = "abc123"
default_namespace = "prod"

[completion]
timeout_ms = 1500
cache_ttl_secs = 120
fallback_namespaces = ["default", "shared"]

[logging]
level = "debug"
output = "stderr"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.ensure_valid().is_ok());
    assert_eq!(config.api.default_namespace, "prod");
    assert_eq!(config.completion.timeout(), Duration::from_millis(1500));
    assert_eq!(config.completion.cache_ttl(), Duration::from_secs(120));
    assert_eq!(config.completion.fallback_namespaces, vec!["default", "shared"]);
    assert_eq!(config.logging.output, "stderr");

    let shown = config.to_redacted_toml().unwrap();
    assert!(!shown.contains("abc123"));
    assert!(shown.contains("********"));
}

#[test]
fn test_invalid_completion_timeout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("xcsh.toml");
    std::fs::write(&config_file, "[completion]\ntimeout_ms = 0\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let err = config.ensure_valid().unwrap_err();
    assert!(matches!(err, ShellError::ConfigError(_)));
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("xcsh.toml");
    std::fs::write(&config_file, "[completion\ntimeout_ms = ").unwrap();
    assert!(matches!(
        ConfigLoader::load_from_file(&config_file),
        Err(ShellError::ConfigError(_))
    ));
}

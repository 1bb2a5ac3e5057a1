//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_aura_config.toml"));
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err, aura_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[limits]
free_daily_limit = 10

[models.premium]
model = "gpt-4-turbo"
max_response_tokens = 1024
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.limits.free_daily_limit, 10);
    assert_eq!(config.models.premium.model, "gpt-4-turbo");
    assert_eq!(config.models.premium.max_response_tokens, 1024);
    // Defaults preserved
    assert_eq!(config.models.free.model, "gpt-4o-mini");
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.session.hard_expiry_minutes, 120);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err, aura_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_keeps_parsed_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[models.free]
temperature = 9.5
"#,
    )
    .unwrap();

    // Loader warns but returns the parsed config as-is; strict validation
    // is the caller's choice via `validation::validate`.
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.models.free.temperature, 9.5);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aura").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.limits.free_daily_limit, 5);
    assert_eq!(config.provider.api_base, "https://api.openai.com/v1");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::AuraConfig;

    let content = default_config_toml();
    let config: AuraConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.retry.base_delay_ms, 500);
}

#[test]
fn default_config_path_is_reasonable() {
    // This may not work in all CI environments, but should work locally
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("aura"));
        assert!(path_str.ends_with("config.toml"));
    }
}

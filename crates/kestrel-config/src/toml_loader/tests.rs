//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_kestrel_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, kestrel_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[api]
base_url = "http://chat.internal:9000"

[feed]
poll_timeout_ms = 250
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, "http://chat.internal:9000");
    assert_eq!(config.feed.poll_timeout_ms, 250);
    // Defaults preserved
    assert_eq!(config.feed.channel, "php-chat");
    assert_eq!(config.session.shutdown_grace_ms, 2000);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, kestrel_common::ConfigError::ParseError(_)));
    assert!(err.to_string().contains("failed to parse TOML"));
}

#[test]
fn load_config_with_out_of_range_values_is_returned_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\nshutdown_grace_ms = 999999\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.shutdown_grace_ms, 999_999);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kestrel").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.feed.channel, "php-chat");
    assert_eq!(config.api.base_url, "http://localhost:8080");
}

#[test]
fn default_template_documents_every_section() {
    let content = super::template::default_config_toml();
    for section in ["[api]", "[feed]", "[session]", "[logging]"] {
        assert!(content.contains(section), "missing {section}");
    }
    assert!(content.contains("connect_timeout_secs = 10     # 1-120, connect + subscribe"));
    assert!(!content.contains("Schema version"));
}

#[test]
fn create_default_config_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[feed]\nchannel = \"mine\"\n").unwrap();

    create_default_config(&path).unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.feed.channel, "mine");
}

#[test]
fn create_default_config_reports_unwritable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("kestrel");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = create_default_config(&blocker.join("config.toml")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("failed to create config directory"), "{message}");
    assert!(message.contains("kestrel"), "{message}");
}

#[test]
fn default_config_path_ends_with_kestrel_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("kestrel/config.toml"));
    }
}

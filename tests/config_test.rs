//! Config file tests

use chronosnap::config::{Config, API_KEY_ENV};
use chronosnap::error::ChronoSnapError;
use tempfile::tempdir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();

    assert!(config.api_key.is_none());
    assert_eq!(config.edit_model, "gemini-2.5-flash-image");
    assert_eq!(config.analysis_model, "gemini-3-pro-preview");
    assert_eq!(config.timeout_seconds, 120);
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        api_key: Some("abc".to_string()),
        timeout_seconds: 30,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.api_key.as_deref(), Some("abc"));
    assert_eq!(loaded.timeout_seconds, 30);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "edit_model": "custom-image-model" }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.edit_model, "custom-image-model");
    assert_eq!(config.analysis_model, "gemini-3-pro-preview");
}

#[test]
fn test_broken_file_is_json_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ nope").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ChronoSnapError::JsonParse(_))));
}

#[test]
fn test_api_key_from_file() {
    if std::env::var(API_KEY_ENV).is_ok() {
        eprintln!("{API_KEY_ENV} is set; skipping");
        return;
    }

    let config = Config::default();
    assert!(matches!(config.get_api_key(), Err(ChronoSnapError::MissingApiKey)));

    let config = Config {
        api_key: Some("  from-file ".to_string()),
        ..Default::default()
    };
    assert_eq!(config.get_api_key().unwrap(), "  from-file ");
}

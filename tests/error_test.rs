//! Error case tests
//!
//! Error conversions and the messages users see

use chronosnap::error::ChronoSnapError;
use chronosnap::upload;
use std::path::Path;
use tempfile::tempdir;

/// Loading a file that does not exist
#[test]
fn test_load_nonexistent_image() {
    let result = upload::load_image(Path::new("/nonexistent/path/12345.jpg"));
    assert!(matches!(result, Err(ChronoSnapError::FileNotFound(_))));
}

/// A directory is not an image
#[test]
fn test_load_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = upload::load_image(dir.path());
    assert!(matches!(result, Err(ChronoSnapError::FileNotFound(_))));
}

/// Non-image files are rejected by extension
#[test]
fn test_load_text_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let result = upload::load_image(&path);
    assert!(matches!(
        result,
        Err(ChronoSnapError::Core(chronosnap_common::Error::UnsupportedMimeType(ext))) if ext == "txt"
    ));
}

/// Every variant renders a message
#[test]
fn test_error_display() {
    let errors = vec![
        ChronoSnapError::Config("bad config".to_string()),
        ChronoSnapError::MissingApiKey,
        ChronoSnapError::FileNotFound("me.jpg".to_string()),
        ChronoSnapError::ConflictingInstruction,
        ChronoSnapError::Prompt("interrupted".to_string()),
        ChronoSnapError::Http("tls".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty message: {:?}", err);
    }
}

/// MissingApiKey tells the user how to fix it
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", ChronoSnapError::MissingApiKey);
    assert!(display.contains("GEMINI_API_KEY"));
    assert!(display.contains("chronosnap config --set-api-key"));
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ChronoSnapError = io_err.into();

    assert!(matches!(err, ChronoSnapError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ChronoSnapError = json_err.into();
    assert!(matches!(err, ChronoSnapError::JsonParse(_)));
}

/// Core errors pass through with their own message
#[test]
fn test_core_error_transparent() {
    let core = chronosnap_common::Error::Generation("no image produced".to_string());
    let err: ChronoSnapError = core.into();

    assert!(matches!(err, ChronoSnapError::Core(_)));
    assert_eq!(format!("{}", err), "Generation error: no image produced");
}

//! Error types

use thiserror::Error;

/// Shared error type
///
/// Every variant is terminal for the single operation that produced it only;
/// front ends turn it into a message at the screen that started the operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Camera permission denied or no video input available
    #[error("Device error: {0}")]
    Device(String),

    /// Malformed data URL or undecodable image payload
    #[error("Format error: {0}")]
    Format(String),

    /// Frame requested before the stream was ready
    #[error("Capture error: {0}")]
    Capture(String),

    /// Edit endpoint returned no image, or the call itself failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Analysis call failed outright
    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("No image selected")]
    NoImage,

    #[error("Instruction must not be empty")]
    EmptyInstruction,

    #[error("Unknown era preset: {0}")]
    UnknownEra(String),

    #[error("Unsupported file type: {0} (expected image/*)")]
    UnsupportedMimeType(String),

    /// A request for this screen is already in flight
    #[error("A request is already in progress")]
    Busy,

    /// The operation does not belong to the active screen
    #[error("Not available on the {0} screen")]
    WrongScreen(&'static str),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Format(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

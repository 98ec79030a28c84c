use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronoSnapError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No API key configured. Set GEMINI_API_KEY or run `chronosnap config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Pick either --era or --prompt, not both")]
    ConflictingInstruction,

    #[error("Selection aborted: {0}")]
    Prompt(String),

    #[error(transparent)]
    Core(#[from] chronosnap_common::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, ChronoSnapError>;

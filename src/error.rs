//! Error types for Resyme.

use thiserror::Error;

/// Library-level error type for Resyme operations.
#[derive(Error, Debug)]
pub enum ResymeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not a recognizable YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Could not parse YouTube response: {0}")]
    Parse(String),

    #[error("Caption payload contained no usable lines")]
    EmptyCaptions,

    #[error("A video is already being processed")]
    AlreadyProcessing,

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ResymeError {
    /// Terminal failures; the acquisition pipeline stops immediately instead
    /// of trying another strategy.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResymeError::InvalidUrl(_) | ResymeError::VideoUnavailable(_)
        )
    }

    /// Transport-level failures, as opposed to content-level ones.
    pub fn is_network(&self) -> bool {
        matches!(self, ResymeError::Http(_))
    }
}

/// Result type alias for Resyme operations.
pub type Result<T> = std::result::Result<T, ResymeError>;

use thiserror::Error;

/// Errors raised while scanning a card.
///
/// Only `ImageDecode`, `Io`, `Config`, `Layout` and `Serialization` ever reach the caller of a
/// scan. `Ocr` and `Timeout` are produced by recognition and recovered per field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CardError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR timed out after {0} ms")]
    Timeout(u64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for CardError {
    fn from(err: std::io::Error) -> Self {
        CardError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CardError {
    fn from(err: serde_json::Error) -> Self {
        CardError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CardError>;

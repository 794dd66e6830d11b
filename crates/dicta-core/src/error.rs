use thiserror::Error;

/// Top-level error type for the dicta system.
///
/// Each variant covers one subsystem. Subsystem crates return `DictaError`
/// directly so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DictaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Element not eligible: {0}")]
    Eligibility(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for DictaError {
    fn from(err: toml::de::Error) -> Self {
        DictaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DictaError {
    fn from(err: toml::ser::Error) -> Self {
        DictaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DictaError {
    fn from(err: serde_json::Error) -> Self {
        DictaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for dicta operations.
pub type Result<T> = std::result::Result<T, DictaError>;

//! Error types for fieldmap

use thiserror::Error;

/// Result type alias for fieldmap operations
pub type Result<T> = std::result::Result<T, FieldmapError>;

/// Main error type for fieldmap
#[derive(Error, Debug)]
pub enum FieldmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),
}

//! Error types for comptree-io

use thiserror::Error;

/// Errors that can occur during image I/O
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] comptree_core::Error),

    /// Malformed PNM header
    #[error("bad header: {0}")]
    BadHeader(String),

    /// Recognized file, unsupported variant
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

//! Error types for comptree-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] comptree_core::Error),

    /// Neighborhood has no displacements
    #[error("empty neighborhood")]
    EmptyNeighborhood,
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;

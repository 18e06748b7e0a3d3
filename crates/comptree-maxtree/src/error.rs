//! Error types for comptree-maxtree

use thiserror::Error;

/// Errors that can occur while building or querying a component tree
#[derive(Debug, Error)]
pub enum TreeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] comptree_core::Error),

    /// Morphology error (gradient preprocessing)
    #[error("morphology error: {0}")]
    Morph(#[from] comptree_morph::MorphError),

    /// Neighborhood has no displacements
    #[error("empty neighborhood")]
    EmptyNeighborhood,

    /// Intensity range too wide for the dense hierarchical queue
    #[error("level range too large: {levels} levels")]
    LevelRangeTooLarge { levels: u64 },
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

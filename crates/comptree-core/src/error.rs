//! Error types for comptree-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}x{depth}")]
    InvalidDimension { width: u32, height: u32, depth: u32 },

    /// Backing buffer does not match the requested dimensions
    #[error("data size mismatch: expected {expected} elements, got {actual}")]
    DataSizeMismatch { expected: usize, actual: usize },

    /// Coordinate outside the image
    #[error("position out of bounds: ({x}, {y}, {z})")]
    OutOfBounds { x: i64, y: i64, z: i64 },

    /// Operation requires two images of the same shape
    #[error("incompatible image sizes: {0}x{1}x{2} vs {3}x{4}x{5}")]
    IncompatibleSizes(u32, u32, u32, u32, u32, u32),

    /// Crop or paste region does not fit inside the image
    #[error("invalid region: {0}")]
    InvalidRegion(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the builders crate.

use thiserror::Error;

/// Errors raised by index-based builder operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// An index was outside the staged collection.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, BuilderError>;

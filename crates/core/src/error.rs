//! Error types for tabgrid table reconstruction.

use thiserror::Error;

/// Primary error type for table reconstruction operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("bounding box of an empty collection")]
    EmptyInput,

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("thread pool: {0}")]
    ThreadPool(String),
}

/// Convenience Result type alias for TableError.
pub type Result<T> = std::result::Result<T, TableError>;

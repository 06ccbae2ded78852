//! Error types for ORDO ordering

use thiserror::Error;

/// Ordering errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Two unclassified values share a type name that has no registered rule
    #[error("Type '{type_name}' is not ordered")]
    Unordered { type_name: String },

    #[error("Comparison exceeded the nesting limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    // Constructor errors
    #[error("Array shape {shape:?} does not fit {len} elements")]
    ShapeMismatch { shape: Vec<usize>, len: usize },
}

/// Result type for ordering operations
pub type OrderResult<T> = Result<T, OrderError>;

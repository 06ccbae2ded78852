//! Error types for sorted map operations

use ordo_core::OrderError;
use thiserror::Error;

/// Sorted map errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Store keys out of order at index {index}")]
    UnsortedStore { index: usize },

    #[error("Key ordering failed: {0}")]
    Order(#[from] OrderError),
}

impl MapError {
    pub(crate) fn key_not_found(key: &impl std::fmt::Debug) -> Self {
        MapError::KeyNotFound {
            key: format!("{:?}", key),
        }
    }
}

/// Result type for sorted map operations
pub type MapResult<T> = Result<T, MapError>;

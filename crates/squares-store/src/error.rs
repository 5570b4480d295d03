//! Error types for store access.

use thiserror::Error;

/// Failures talking to the shared store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Subscription closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, StoreError>;

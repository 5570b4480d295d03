//! Error types for board values.

use thiserror::Error;

/// Errors raised while parsing or validating board values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    #[error("Cell out of range: ({row}, {col})")]
    CellOutOfRange { row: u8, col: u8 },

    #[error("Max selections must be between 1 and 100 (got {0})")]
    InvalidMaxSelections(i64),
}

pub type Result<T> = std::result::Result<T, CoreError>;

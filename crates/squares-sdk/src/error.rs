//! Error types for board operations.
//!
//! Every variant is an expected, recoverable outcome. The `Display` text is
//! the short status line shown to the participant.

use squares_core::CoreError;
use squares_store::StoreError;
use thiserror::Error;

/// Why a board operation was refused or failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("The board is locked.")]
    BoardLocked,

    #[error("Enter your name to select a box.")]
    NameRequired,

    #[error("That box is already taken by {0}.")]
    AlreadyTaken(String),

    #[error("Selection limit reached ({0}).")]
    SelectionLimitReached(u32),

    #[error("Admins can only remove selections.")]
    NothingToRemove,

    #[error("Select at least one box before locking in.")]
    NothingPending,

    #[error("Fill all boxes before generating numbers ({filled}/100 filled).")]
    BoardNotFull { filled: usize },

    #[error("Unable to remove selection.")]
    RemovalFailed,

    #[error("Only an administrator can do that.")]
    NotAdmin,

    #[error("Max selections must be between 1 and 100.")]
    InvalidMaxSelections(i64),

    #[error("{0}")]
    Invalid(CoreError),

    #[error("Unable to save: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for BoardError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidMaxSelections(value) => BoardError::InvalidMaxSelections(value),
            other => BoardError::Invalid(other),
        }
    }
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

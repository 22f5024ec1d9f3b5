use taskboard_core::error::CoreError;

use crate::assistant::AssistantError;

/// Failure of a board operation.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A domain-level error: validation, unknown ids, invalid status.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store could not complete the operation.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The answer provider failed.
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

pub type BoardResult<T> = Result<T, BoardError>;

//! Reminders service errors.

use thiserror::Error;

use crate::{domain::ValidationError, storage::StorageError};

/// Errors from a reminder operation.
#[derive(Debug, Error)]
pub enum RemindersServiceError {
    /// Input failed validation; nothing was written.
    #[error("invalid reminder")]
    Validation(#[from] ValidationError),

    /// The storage host rejected the write.
    #[error("storage error")]
    Storage(#[from] StorageError),
}

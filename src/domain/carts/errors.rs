//! Carts service errors.

use thiserror::Error;

use crate::{domain::ValidationError, storage::StorageError};

/// Errors from a cart operation.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// Input failed validation; nothing was written.
    #[error("invalid cart item")]
    Validation(#[from] ValidationError),

    /// The storage host rejected the write.
    #[error("storage error")]
    Storage(#[from] StorageError),
}

//! Shared error types for the services crate.

use thiserror::Error;

use recall_core::model::SetError;
use storage::repository::StorageError;

/// Errors emitted by `SetService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetServiceError {
    #[error(transparent)]
    Set(#[from] SetError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

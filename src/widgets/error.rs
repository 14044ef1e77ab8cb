//! Widget error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by widget operations
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Input failed validation; no state was changed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Actor is not available for new work
    #[error("Busy: {0}")]
    Busy(String),

    /// External provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Persisting state failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;

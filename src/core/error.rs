use thiserror::Error;

use crate::services::StoreError;

/// Failures surfaced by the relationship engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller error, such as a user deciding on themselves. Not retried.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The ledger or message log could not be reached; nothing was applied.
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

impl EngineError {
    /// Whether the caller may retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StorageUnavailable(_))
    }
}

//! Resolution context error types.

use thiserror::Error;

/// Errors raised by [`crate::ResolutionContext`] operations.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Internal lock was poisoned by a panicking holder.
    #[error("resolution context lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for resolution context operations.
pub type ResolutionResult<T> = Result<T, ResolutionError>;

//! Errors the dispatcher can surface beyond the shared
//! [`fleetgate_core::GatingError`] taxonomy.

use fleetgate_core::GatingError;
use thiserror::Error;

/// Dispatch-specific errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No reachable executor declared the requested action.
    #[error("{0}")]
    NoAgent(String),

    /// The agent RPC itself failed.
    #[error("agent execution failed: {0}")]
    Agent(String),

    /// The retry loop was canceled while waiting to retry.
    #[error("{operation} canceled while waiting to retry")]
    RetryCanceled {
        /// Name of the operation that was retried.
        operation: String,
    },

    /// All retry attempts were exhausted.
    #[error("{operation} failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Name of the operation that was retried.
        operation: String,
        /// Total attempts made, including the first.
        attempts: u32,
        /// The final error message.
        message: String,
    },

    /// The post-state verification loop never observed the expected
    /// state.
    #[error("verification of {operation} did not observe the expected state after {attempts} attempts")]
    VerificationFailed {
        /// Name of the operation verified.
        operation: String,
        /// Attempts made.
        attempts: u32,
    },
}

/// Convenience alias for fallible dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

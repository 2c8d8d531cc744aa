//! Errors raised while building or validating a [`crate::policy::GatingPolicy`].

use thiserror::Error;

/// Errors the policy crate can surface. These are configuration-time
/// failures; runtime decisions are [`crate::policy::PolicyOutcome`], not
/// errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A policy configuration value was malformed.
    #[error("invalid policy configuration: {message}")]
    InvalidConfig {
        /// Description of the violated constraint.
        message: String,
    },
}

/// Convenience alias for fallible policy construction.
pub type PolicyResult<T> = Result<T, PolicyError>;

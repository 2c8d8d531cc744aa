//! Error taxonomy for the safety gating core.
//!
//! Four categories, matching the propagation policy: input errors and
//! safety blocks are returned at the tool boundary without touching the
//! agent; transient failures are retried locally by the dispatcher;
//! fatal failures bubble unchanged.

use thiserror::Error;

/// Errors the gating core can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatingError {
    /// The requested tool name is not registered.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// The tool name that was requested.
        name: String,
    },

    /// Missing or malformed tool arguments; not retryable.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violated constraint.
        message: String,
    },

    /// A mutating action targeted a resource never discovered in this
    /// session.
    #[error("strict resolution: {action} on {resource_id} was refused: {message}")]
    StrictResolution {
        /// Canonical id of the undiscovered resource.
        resource_id: String,
        /// The action that was attempted.
        action: String,
        /// Human-readable explanation.
        message: String,
    },

    /// A mutating action targeted a host when a more specific child
    /// resource on that host was recently referenced.
    #[error("routing mismatch targeting {target_host}: {message}")]
    RoutingMismatch {
        /// Canonical id of the host that was targeted.
        target_host: String,
        /// Canonical ids of more specific resources that should probably
        /// have been targeted instead.
        more_specific_resources: Vec<String>,
        /// Same set, kept as a separate field to match the envelope shape
        /// (`more_specific_resource_ids`) exactly.
        more_specific_ids: Vec<String>,
        /// Kinds of the more-specific children (for telemetry labels).
        child_kinds: Vec<String>,
        /// Human-readable explanation.
        message: String,
    },

    /// The policy pipeline refused the command outright.
    #[error("policy blocked: {reason}")]
    PolicyBlocked {
        /// Why the policy refused the command.
        reason: String,
    },

    /// A command requiring a TTY, pager, or unbounded stream was refused.
    #[error("non-interactive guard: {message}")]
    NonInteractive {
        /// Human-readable explanation.
        message: String,
    },

    /// A transient failure the dispatcher's retry loop should attempt to
    /// recover from.
    #[error("transient failure: {message}")]
    Transient {
        /// Underlying message from the collaborator.
        message: String,
    },

    /// A fatal failure; never retried, bubbled to the caller unchanged.
    #[error("fatal failure: {message}")]
    Fatal {
        /// Underlying message from the collaborator.
        message: String,
    },
}

impl GatingError {
    /// `error_code` used in the tool envelope, e.g. `STRICT_RESOLUTION`
    /// or `ROUTING_MISMATCH`.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatingError::UnknownTool { .. } => "UNKNOWN_TOOL",
            GatingError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            GatingError::StrictResolution { .. } => "STRICT_RESOLUTION",
            GatingError::RoutingMismatch { .. } => "ROUTING_MISMATCH",
            GatingError::PolicyBlocked { .. } => "POLICY_BLOCKED",
            GatingError::NonInteractive { .. } => "NON_INTERACTIVE_BLOCK",
            GatingError::Transient { .. } => "TRANSIENT",
            GatingError::Fatal { .. } => "FATAL",
        }
    }

    /// Whether this error is auto-recoverable by the model (strict
    /// resolution and routing mismatch both are: discover, then retry).
    pub fn auto_recoverable(&self) -> bool {
        matches!(
            self,
            GatingError::StrictResolution { .. } | GatingError::RoutingMismatch { .. }
        )
    }

    /// A hint telling the model how to recover, when one applies.
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            GatingError::StrictResolution { resource_id, .. } => Some(format!(
                "search or list resources first to discover {resource_id}, then retry"
            )),
            GatingError::RoutingMismatch {
                more_specific_ids, ..
            } => Some(format!(
                "retarget the operation at one of the more specific resources: {}",
                more_specific_ids.join(", ")
            )),
            _ => None,
        }
    }

    /// Whether the dispatcher's retry loop should attempt this operation
    /// again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatingError::Transient { .. })
    }
}

/// Convenience alias for fallible gating operations.
pub type GatingResult<T> = Result<T, GatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_resolution_is_auto_recoverable() {
        let err = GatingError::StrictResolution {
            resource_id: "vm:999".to_string(),
            action: "restart".to_string(),
            message: "never discovered".to_string(),
        };
        assert!(err.auto_recoverable());
        assert_eq!(err.error_code(), "STRICT_RESOLUTION");
        assert!(err.recovery_hint().unwrap().contains("search"));
    }

    #[test]
    fn transient_is_retryable_others_are_not() {
        let transient = GatingError::Transient {
            message: "database is locked".to_string(),
        };
        assert!(transient.is_retryable());
        let fatal = GatingError::Fatal {
            message: "no route".to_string(),
        };
        assert!(!fatal.is_retryable());
    }
}

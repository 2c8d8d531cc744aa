//! Convenience re-exports for consumers of the policy pipeline.

pub use crate::error::{PolicyError, PolicyResult};
pub use crate::pipeline::{evaluate, GateOutcome, Invocation};
pub use crate::policy::{GatingPolicy, PolicyOutcome};

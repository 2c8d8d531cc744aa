//! Shared types, error taxonomy and narrow provider traits for the
//! fleetgate safety gating core.
//!
//! This crate has no knowledge of the classifier, resolution context or
//! policy pipeline built on top of it — it only defines the vocabulary
//! they share: resources, control levels, decisions, envelopes and the
//! external-collaborator interfaces the core talks to.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod envelope;
pub mod error;
pub mod prelude;
pub mod providers;
pub mod types;

pub use error::{GatingError, GatingResult};
pub use types::{
    ApprovalId, ApprovalTicket, ControlLevel, ExecutorRef, IntentResult, Intention,
    NonInteractiveBlock, NonInteractiveCategory, PolicyDecision, ResolvedResource, ResourceKind,
    RiskLevel, SessionId,
};

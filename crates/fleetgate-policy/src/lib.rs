//! Policy pipeline and approval/control-level gate for the fleetgate
//! safety gating core.
//!
//! [`policy::GatingPolicy`] holds the admin-configured hard boundaries;
//! [`pipeline::evaluate`] runs the five-step gate order a mutating
//! invocation must pass — read-only refusal, pre-approval bypass, policy
//! check, controlled-mode unconditional ticket, dispatch — minting
//! [`fleetgate_core::ApprovalTicket`]s deterministically per
//! `(command, target_type, target_id)`.
//!
//! # Example
//!
//! ```
//! use fleetgate_core::ControlLevel;
//! use fleetgate_policy::prelude::*;
//!
//! let policy = GatingPolicy::permissive();
//! let invocation = Invocation {
//!     command: "docker restart jellyfin",
//!     target_type: "docker_container",
//!     target_id: "docker_container:delly:jellyfin",
//!     agent_hostname: Some("delly".to_string()),
//!     risk: fleetgate_core::RiskLevel::HighWrite,
//!     control_level: ControlLevel::Controlled,
//!     pre_approved: false,
//! };
//! match evaluate(&policy, &invocation) {
//!     GateOutcome::ApprovalRequired { ticket } => {
//!         println!("minted ticket {}", ticket.id);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Error types for policy configuration.
pub mod error;
/// The approval & control-level gate pipeline.
pub mod pipeline;
/// The admin-configured security policy.
pub mod policy;
pub mod prelude;

pub use error::{PolicyError, PolicyResult};
pub use pipeline::{evaluate, GateOutcome, Invocation};
pub use policy::{GatingPolicy, PolicyOutcome};

//! Routing and agent dispatch for the fleetgate safety gating core.
//!
//! Given a resolved target and an action, this crate selects the
//! executor that should run the command (cascading from a Docker
//! container to its enclosing host when needed), runs it over an
//! [`fleetgate_core::providers::AgentServer`], retries transient queue
//! failures with a fixed backoff, and verifies the post-state of
//! mutating commands.
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetgate_dispatch::prelude::*;
//! use fleetgate_core::providers::AgentServer;
//! use fleetgate_core::ResolvedResource;
//!
//! # async fn example(agent_server: &dyn AgentServer, resource: &ResolvedResource) -> DispatchResult<()> {
//! let dispatcher = Dispatcher::new(agent_server);
//! dispatcher
//!     .dispatch_and_verify(resource, "start", "docker start jellyfin", "docker inspect jellyfin", true)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod dispatcher;
pub mod error;
pub mod prelude;
pub mod retry;
pub mod routing;
pub mod verify;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};

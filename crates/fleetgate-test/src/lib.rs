//! Shared test fixtures and mocks for the fleetgate safety gating core.
//!
//! Provides fixture builders for [`fleetgate_core::ResolvedResource`]s
//! and [`fleetgate_core::ApprovalTicket`]s, and mock implementations of
//! the narrow provider traits other crates need as a dev-dependency when
//! exercising the registry's tools end to end.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! fleetgate-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust
//! use fleetgate_core::providers::AgentServer;
//! use fleetgate_test::{fixtures, mocks::FakeAgentServer};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let container = fixtures::docker_container("delly", "jellyfin");
//! let agent = FakeAgentServer::new(vec!["delly".to_string()]);
//! assert!(agent.connected_agents().await.unwrap().contains(&"delly".to_string()));
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

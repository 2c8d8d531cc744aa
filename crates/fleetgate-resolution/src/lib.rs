//! Session-scoped catalog of resources the model has discovered.
//!
//! This crate provides:
//! - [`ResolutionContext`], the alias/canonical-id/access-timestamp
//!   catalog a session accumulates as the model lists, searches and
//!   fetches fleet resources
//! - strict-resolution lookups used to refuse mutations against
//!   resources the model never discovered
//! - the routing-mismatch guard: finding recently accessed children of a
//!   host the model is about to target directly
//!
//! # Example
//!
//! ```
//! use fleetgate_resolution::ResolutionContext;
//! use fleetgate_core::{ResolvedResource, ResourceKind};
//! use std::collections::BTreeSet;
//!
//! let ctx = ResolutionContext::new();
//! let resource = ResolvedResource {
//!     kind: ResourceKind::DockerContainer,
//!     provider_uid: Some("abc123".to_string()),
//!     name: "jellyfin".to_string(),
//!     aliases: BTreeSet::from(["jellyfin".to_string()]),
//!     host_uid: Some("delly".to_string()),
//!     host_name: Some("delly".to_string()),
//!     location_chain: vec!["node:delly".to_string()],
//!     executors: vec![],
//! };
//! ctx.register(resource);
//! assert!(ctx.lookup_by_alias("jellyfin").is_some());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;

pub use context::{DEFAULT_RECENT_ACCESS_WINDOW, ResolutionContext};
pub use error::{ResolutionError, ResolutionResult};

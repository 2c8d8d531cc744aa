//! Unified prelude for the fleetgate safety gating core.
//!
//! This crate provides a single import to bring in all commonly used
//! types from across the gating core. Use this when you need types from
//! multiple crates without managing individual imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleetgate_prelude::*;
//!
//! // Now you have access to types from:
//! // - fleetgate-core (ResolvedResource, ControlLevel, GatingError, envelope)
//! // - fleetgate-classifier (classify, RiskLevel, Intention)
//! // - fleetgate-resolution (ResolutionContext)
//! // - fleetgate-policy (GatingPolicy, pipeline::evaluate)
//! // - fleetgate-dispatch (Dispatcher, retry, routing)
//! // - fleetgate-registry (ToolRegistry, GatingTool, gate_read, gate_write)
//! // - fleetgate-config (GatingConfig, load)
//! // - fleetgate-telemetry (Counters, setup_logging)
//! ```
//!
//! # Per-Crate Preludes
//!
//! If you only need types from specific crates, use their individual
//! preludes:
//!
//! ```rust,ignore
//! use fleetgate_core::prelude::*;
//! use fleetgate_policy::prelude::*;
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetgate_prelude::*;
//! use std::sync::Arc;
//!
//! let config = GatingConfig::default();
//! let counters: Arc<dyn TelemetrySink> = Arc::new(Counters::new());
//! let context = GatingContext::new(&config, counters);
//! assert!(!context.resolution.has_any_resources());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

// Re-export the gating core's shared types and the per-crate preludes.
pub use fleetgate_core::prelude::*;

pub use fleetgate_classifier::{classify, classify_with_inspectors};
pub use fleetgate_config::{GatingConfig, default_config_path, load};
pub use fleetgate_dispatch::prelude::*;
pub use fleetgate_policy::prelude::*;
pub use fleetgate_registry::prelude::*;
pub use fleetgate_resolution::prelude::*;
pub use fleetgate_telemetry::prelude::*;

//! Structured telemetry for the gating core: low-cardinality counters,
//! a process-wide rate-limited debug log, and `tracing` setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetgate_telemetry::{LogConfig, LogFormat, setup_logging, RequestContext};
//!
//! # fn main() -> Result<(), fleetgate_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("fleetgate_classifier=debug");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("policy_pipeline").with_operation("evaluate");
//! let _guard = ctx.enter();
//! tracing::info!("evaluating command");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod counters;
mod error;
mod logging;
mod ratelimit;

pub use context::{RequestContext, RequestGuard};
pub use counters::Counters;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
pub use ratelimit::RateLimiter;

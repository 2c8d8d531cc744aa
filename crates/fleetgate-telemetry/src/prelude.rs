//! Prelude module - commonly used types for convenient import.
//!
//! Use `use fleetgate_telemetry::prelude::*;` to import all essential
//! types.
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetgate_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! let config = LogConfig::new("info").with_format(LogFormat::Pretty);
//! setup_logging(&config)?;
//!
//! let counters = Counters::new();
//! let ctx = RequestContext::new("policy_pipeline").with_operation("evaluate");
//! let _guard = ctx.enter();
//! tracing::info!("evaluating command");
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging configuration
pub use crate::{LogConfig, LogFormat, LogTarget};

// Setup functions
pub use crate::{setup_default_logging, setup_logging};

// Request context
pub use crate::{RequestContext, RequestGuard};

// Counters and rate limiting
pub use crate::{Counters, RateLimiter};

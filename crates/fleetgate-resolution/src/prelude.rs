//! Commonly used types for convenient import.
//!
//! ```rust
//! use fleetgate_resolution::prelude::*;
//!
//! let ctx = ResolutionContext::new();
//! assert!(!ctx.has_any_resources());
//! ```

pub use crate::{ResolutionContext, ResolutionError, ResolutionResult};
pub use crate::context::DEFAULT_RECENT_ACCESS_WINDOW;

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Tool Registry: the composition root of the safety gating core.
//!
//! Ties the Resolution Context, Execution Intent Classifier, Policy
//! Pipeline and Telemetry together behind a handful of [`GatingTool`]
//! implementations, enumerated and dispatched through a single
//! [`ToolRegistry`].
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(Box::new(InspectTool::new(context.clone(), agent.clone(), redactor.clone())));
//! registry.register(Box::new(RunCommandTool::new(context.clone(), agent, redactor)));
//! let envelope = registry.execute("run_command", config.control_level, args).await;
//! ```

mod command_tool;
mod gate;
mod guards;
pub mod prelude;
mod registry;
mod tool;
mod update_tool;
mod url_fetch;

pub use command_tool::{InspectTool, RunCommandTool};
pub use gate::{Gate, GatingContext, gate_read, gate_write};
pub use registry::ToolRegistry;
pub use tool::GatingTool;
pub use update_tool::{ListUpdatesTool, UpdateContainerTool};
pub use url_fetch::UrlFetchTool;

//! Convenience re-exports for callers wiring up the registry.

pub use crate::command_tool::{InspectTool, RunCommandTool};
pub use crate::gate::{Gate, GatingContext, gate_read, gate_write};
pub use crate::registry::ToolRegistry;
pub use crate::tool::GatingTool;
pub use crate::update_tool::{ListUpdatesTool, UpdateContainerTool};
pub use crate::url_fetch::UrlFetchTool;

//! Name → handler table with control-level gating and deterministic
//! enumeration.

use std::collections::HashMap;

use fleetgate_core::envelope::ToolEnvelope;
use fleetgate_core::{ControlLevel, GatingError};
use serde_json::Value;

use crate::tool::GatingTool;

struct Entry {
    tool: Box<dyn GatingTool>,
}

/// Maps tool names to handlers, preserving registration order for
/// deterministic listing, and centrally enforces the control-level gate
/// ahead of dispatch.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Entry>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Re-registering the same name replaces the
    /// handler but keeps its original position in `list()`.
    pub fn register(&mut self, tool: Box<dyn GatingTool>) {
        let name = tool.name();
        if !self.tools.contains_key(name) {
            self.order.push(name);
        }
        self.tools.insert(name, Entry { tool });
    }

    /// Ordered tool names visible at `control_level`; mutating tools are
    /// hidden when the level is `ReadOnly`.
    #[must_use]
    pub fn list(&self, control_level: ControlLevel) -> Vec<&'static str> {
        self.order
            .iter()
            .copied()
            .filter(|name| {
                let entry = &self.tools[name];
                !(control_level.is_read_only() && entry.tool.require_control())
            })
            .collect()
    }

    /// Look up a tool's schema/description without executing it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn GatingTool> {
        self.tools.get(name).map(|e| e.tool.as_ref())
    }

    /// Execute `name` with `args`, enforcing the control-level gate
    /// ahead of dispatch: a mutating tool invoked directly while the
    /// host is in `ReadOnly` mode is refused without reaching the
    /// handler.
    pub async fn execute(&self, name: &str, control_level: ControlLevel, args: Value) -> ToolEnvelope {
        let Some(entry) = self.tools.get(name) else {
            return ToolEnvelope::error(&GatingError::UnknownTool {
                name: name.to_string(),
            });
        };

        if control_level.is_read_only() && entry.tool.require_control() {
            return ToolEnvelope::error(&GatingError::PolicyBlocked {
                reason: format!("{name} is a mutating tool and this host is in read-only mode"),
            });
        }

        entry.tool.execute(args).await
    }
}

//! The `GatingTool` handler trait and the shared envelope it returns.

use async_trait::async_trait;
use fleetgate_core::envelope::ToolEnvelope;
use serde_json::Value;

/// A tool the registry can dispatch to by name.
///
/// A stable name, a human-readable description and JSON schema for the
/// model, and an `execute` entry point. `require_control` additionally
/// marks whether this tool mutates the fleet — the registry consults it
/// to implement the control-level gate centrally rather than per tool.
#[async_trait]
pub trait GatingTool: Send + Sync {
    /// Tool name, used as the registry key.
    fn name(&self) -> &'static str;

    /// Human-readable description for the model.
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's input arguments.
    fn input_schema(&self) -> Value;

    /// Whether this tool mutates the fleet and must be hidden/gated by
    /// control level.
    fn require_control(&self) -> bool;

    /// Execute the tool against `args`.
    async fn execute(&self, args: Value) -> ToolEnvelope;
}

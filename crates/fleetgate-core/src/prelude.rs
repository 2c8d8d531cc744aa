//! Convenience re-exports for consumers of the gating core's shared
//! types.

pub use crate::envelope::{ContentBlock, ToolEnvelope};
pub use crate::error::{GatingError, GatingResult};
pub use crate::providers::{
    AgentExecutionResult, AgentServer, ApprovalStore, CommandStatus, PolicyEvaluator, Redactor,
    StateProvider, TelemetrySink, UpdatesProvider,
};
pub use crate::types::{
    Adapter, ApprovalId, ApprovalTicket, ControlLevel, ExecutorRef, IntentResult, Intention,
    NonInteractiveBlock, NonInteractiveCategory, PolicyDecision, ResolvedResource, ResourceKind,
    RiskLevel, SessionId,
};

//! Narrow external-collaborator traits.
//!
//! Rather than one god-trait, each external capability the core talks to
//! — fleet state, the agent server, the policy evaluator, the updates
//! provider, the approval store, the sensitive-text redactor, and
//! telemetry — is modeled as its own narrow trait. A handler accepts only
//! the capabilities it actually needs, keeping registry composition
//! explicit instead of threading one monolithic context everywhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatingResult;
use crate::types::PolicyDecision;

/// Result of executing a command on an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentExecutionResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Process exit code.
    pub exit_code: i32,
}

/// Status of an asynchronously queued command (update checks, container
/// updates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CommandStatus {
    /// Accepted, waiting to run.
    Queued,
    /// Currently executing.
    Running,
    /// Completed successfully.
    Succeeded,
    /// Completed with a failure.
    Failed {
        /// Why the command failed.
        reason: String,
    },
}

/// Read-only snapshot access to the monitored fleet. Out of scope: how
/// the snapshot is produced (scraping, polling, push) — only the shape
/// the gating core reads from is specified here.
#[async_trait]
pub trait StateProvider: Send + Sync {
    /// Fetch a JSON snapshot of a named collection (`nodes`, `vms`,
    /// `containers`, `docker_hosts`, `clusters`, `services`, `tasks`,
    /// `pools`, `backups`).
    async fn snapshot(&self, collection: &str) -> GatingResult<serde_json::Value>;
}

/// Execution-capable connection to managed agents.
#[async_trait]
pub trait AgentServer: Send + Sync {
    /// Agent ids currently connected.
    async fn connected_agents(&self) -> GatingResult<Vec<String>>;

    /// Execute `command` against `target_type`/`target_id` via `agent_id`.
    async fn execute_command(
        &self,
        agent_id: &str,
        command: &str,
        target_type: &str,
        target_id: &str,
    ) -> GatingResult<AgentExecutionResult>;
}

/// External policy evaluation, independent of the built-in policy
/// pipeline — e.g. an operator-maintained allow/deny service.
#[async_trait]
pub trait PolicyEvaluator: Send + Sync {
    /// Evaluate a prepared command string.
    async fn evaluate(&self, command: &str) -> GatingResult<PolicyDecision>;
}

/// Docker image update queueing.
#[async_trait]
pub trait UpdatesProvider: Send + Sync {
    /// Updates pending for containers on `host_id`.
    async fn pending_updates(&self, host_id: &str) -> GatingResult<serde_json::Value>;

    /// Trigger an update check on `host_id`.
    async fn trigger_update_check(&self, host_id: &str) -> GatingResult<CommandStatus>;

    /// Queue an image update for `container_id`/`name` on `host_id`.
    async fn update_container(
        &self,
        host_id: &str,
        container_id: &str,
        name: &str,
    ) -> GatingResult<CommandStatus>;

    /// Whether update actions are enabled (see `disable-update-actions`
    /// configuration option).
    fn is_update_actions_enabled(&self) -> bool;
}

/// Approval ticket persistence, owned by the host application.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Persist a minted ticket, returning its id.
    async fn create(
        &self,
        command: &str,
        target_type: &str,
        target_id: &str,
        agent_hostname: Option<&str>,
        description: &str,
    ) -> GatingResult<String>;
}

/// Sensitive-text redaction applied to command output before it reaches
/// the model.
pub trait Redactor: Send + Sync {
    /// Redact `text`, returning the redacted text and the number of
    /// values redacted.
    fn redact(&self, text: &str) -> (String, usize);
}

/// Typed counter increments. Implementations must not leak unbounded
/// cardinality: label sets are fixed by the caller, never free-form
/// strings like hostnames or paths.
pub trait TelemetrySink: Send + Sync {
    /// Increment a named counter by one, with a small, fixed label set.
    fn increment(&self, name: &str, labels: &[(&str, &str)]);
}

//! Core data model shared by every gating component: discovered resources,
//! executors, classifier output, policy decisions and approval tickets.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session identifier. Scopes a [`crate::providers`] consumer's
/// resolution context and approval lifecycle; opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of a discovered fleet resource.
///
/// `KubernetesResource` carries the Kubernetes kind (`pod`, `deployment`,
/// `service`, ...) as a string rather than enumerating every Kubernetes
/// object type here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "sub_kind")]
pub enum ResourceKind {
    /// A Proxmox/bare-metal compute node.
    Node,
    /// A virtual machine.
    Vm,
    /// A Linux container (LXC).
    Lxc,
    /// A Docker container.
    DockerContainer,
    /// A Docker host (a node or VM running the Docker daemon).
    DockerHost,
    /// A Kubernetes object; `0` is the Kubernetes kind, e.g. `pod`.
    KubernetesResource(String),
    /// A Proxmox Backup Server instance.
    Pbs,
    /// A storage pool/volume.
    Storage,
}

impl ResourceKind {
    /// Short label used in canonical ids and telemetry.
    pub fn label(&self) -> String {
        match self {
            ResourceKind::Node => "node".to_string(),
            ResourceKind::Vm => "vm".to_string(),
            ResourceKind::Lxc => "lxc".to_string(),
            ResourceKind::DockerContainer => "docker_container".to_string(),
            ResourceKind::DockerHost => "docker_host".to_string(),
            ResourceKind::KubernetesResource(k) => format!("kubernetes_{k}"),
            ResourceKind::Pbs => "pbs".to_string(),
            ResourceKind::Storage => "storage".to_string(),
        }
    }

    /// Whether this kind is scoped to an enclosing host (the canonical id
    /// then includes the host uid).
    pub fn is_scoped(&self) -> bool {
        matches!(
            self,
            ResourceKind::Vm
                | ResourceKind::Lxc
                | ResourceKind::DockerContainer
                | ResourceKind::KubernetesResource(_)
        )
    }
}

/// Access method used to reach a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adapter {
    /// Proxmox VM management (`qm`).
    Qm,
    /// Proxmox container management (`pct`).
    Pct,
    /// Docker CLI/API.
    Docker,
    /// A directly reachable agent (no intermediate hop).
    Direct,
}

/// A named, prioritized route to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorRef {
    /// Identifier of the agent/executor that will run the command.
    pub executor_id: String,
    /// Access method used by this executor.
    pub adapter: Adapter,
    /// Actions this executor is allowed to perform, e.g. `query`, `exec`,
    /// `restart`. `["*"]` means any action is allowed.
    pub actions: Vec<String>,
    /// Routing priority; higher wins ties between multiple executors.
    pub priority: i32,
}

impl ExecutorRef {
    /// Whether this executor declares support for `action`, honoring the
    /// `"*"` wildcard.
    pub fn allows(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == "*" || a == action)
    }
}

/// A fleet resource the model has discovered in the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResource {
    /// What kind of resource this is.
    pub kind: ResourceKind,
    /// Stable id assigned by the source system (VMID, container id, ...).
    pub provider_uid: Option<String>,
    /// Human label.
    pub name: String,
    /// Strings the model may use to refer to this resource.
    pub aliases: BTreeSet<String>,
    /// Uid of the enclosing host, for scoped kinds.
    pub host_uid: Option<String>,
    /// Name of the enclosing host, for scoped kinds.
    pub host_name: Option<String>,
    /// Ordered chain from the outermost ancestor to this resource, e.g.
    /// `["node:delly", "lxc:media-server", "docker:jellyfin"]`.
    pub location_chain: Vec<String>,
    /// Known routes to this resource, highest priority first is not
    /// guaranteed; callers select by priority explicitly.
    pub executors: Vec<ExecutorRef>,
}

impl ResolvedResource {
    /// Canonical resource id: `kind:host:provider_uid` for scoped kinds,
    /// `kind:provider_uid` otherwise, falling back to `name` when no
    /// provider uid is known.
    pub fn canonical_id(&self) -> String {
        let label = self.kind.label();
        let ident = self.provider_uid.as_deref().unwrap_or(&self.name);
        if self.kind.is_scoped() {
            if let Some(host) = &self.host_uid {
                return format!("{label}:{host}:{ident}");
            }
        }
        format!("{label}:{ident}")
    }

    /// Union of `actions` across all executors; `true` if any executor
    /// grants the wildcard.
    pub fn allowed_actions(&self) -> BTreeSet<String> {
        let mut actions = BTreeSet::new();
        for executor in &self.executors {
            for action in &executor.actions {
                actions.insert(action.clone());
            }
        }
        actions
    }

    /// Whether any executor allows `action` (honors the `"*"` wildcard).
    pub fn allows_action(&self, action: &str) -> bool {
        self.executors.iter().any(|e| e.allows(action))
    }

    /// Highest-priority executor that allows `action`.
    pub fn best_executor_for(&self, action: &str) -> Option<&ExecutorRef> {
        self.executors
            .iter()
            .filter(|e| e.allows(action))
            .max_by_key(|e| e.priority)
    }
}

/// Three-valued execution intent produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intention {
    /// Provably non-mutating by construction.
    ReadOnlyCertain,
    /// Non-mutating, but only after content inspection (e.g. inline SQL).
    ReadOnlyConditional,
    /// Mutating, or not provably read-only.
    WriteOrUnknown,
}

impl Intention {
    /// Whether this intent is one of the two read-only variants.
    pub fn is_read_only(self) -> bool {
        matches!(self, Intention::ReadOnlyCertain | Intention::ReadOnlyConditional)
    }
}

/// Back-compat four-bucket risk classification of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No write capability detected.
    ReadOnly,
    /// Mutating but low-impact (e.g. `touch`, `mkdir`).
    LowWrite,
    /// Mutating with moderate impact (e.g. `mv`, `cp`, in-place edits).
    MediumWrite,
    /// Destructive or system-altering (redirects, `rm`, package managers,
    /// `sudo`, ...).
    HighWrite,
}

/// Category of a non-interactive guard block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonInteractiveCategory {
    /// A command explicitly requested a TTY (`-it`, `--tty`, ...).
    TtyFlag,
    /// The command is an interactive pager/editor.
    Pager,
    /// The command streams indefinitely with no exit bound.
    UnboundedStream,
    /// The command is a bare interactive REPL invocation.
    InteractiveRepl,
}

impl fmt::Display for NonInteractiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NonInteractiveCategory::TtyFlag => "tty_flag",
            NonInteractiveCategory::Pager => "pager",
            NonInteractiveCategory::UnboundedStream => "unbounded_stream",
            NonInteractiveCategory::InteractiveRepl => "interactive_repl",
        };
        write!(f, "{s}")
    }
}

/// Details of a blocked non-interactive command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonInteractiveBlock {
    /// Which non-interactive rule fired.
    pub category: NonInteractiveCategory,
    /// Human-readable explanation.
    pub message: String,
    /// A rewritten command that avoids the interactive hazard, when one
    /// exists.
    pub rewrite_suggestion: Option<String>,
    /// Whether `rewrite_suggestion` is safe to apply automatically and
    /// retry, without operator confirmation.
    pub safe_for_auto_apply: bool,
}

/// Output of the execution intent classifier for a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    /// The three-valued intent.
    pub intent: Intention,
    /// Why the classifier reached this intent.
    pub reason: String,
    /// Populated when a non-interactive guard fired.
    pub non_interactive_block: Option<NonInteractiveBlock>,
}

impl IntentResult {
    /// Construct a certain-read-only result.
    pub fn read_only_certain(reason: impl Into<String>) -> Self {
        Self {
            intent: Intention::ReadOnlyCertain,
            reason: reason.into(),
            non_interactive_block: None,
        }
    }

    /// Construct a conditional-read-only result (content inspection).
    pub fn read_only_conditional(reason: impl Into<String>) -> Self {
        Self {
            intent: Intention::ReadOnlyConditional,
            reason: reason.into(),
            non_interactive_block: None,
        }
    }

    /// Construct a write-or-unknown result.
    pub fn write_or_unknown(reason: impl Into<String>) -> Self {
        Self {
            intent: Intention::WriteOrUnknown,
            reason: reason.into(),
            non_interactive_block: None,
        }
    }

    /// Construct a write-or-unknown result carrying a non-interactive
    /// block.
    pub fn blocked_non_interactive(block: NonInteractiveBlock) -> Self {
        Self {
            intent: Intention::WriteOrUnknown,
            reason: block.message.clone(),
            non_interactive_block: Some(block),
        }
    }
}

/// Decision reached by the policy pipeline for a prepared command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    /// Dispatch the command.
    Allow,
    /// Mint an approval ticket and wait for operator confirmation.
    RequireApproval,
    /// Refuse outright.
    Block,
}

/// Deterministic approval ticket identifier, derived from
/// `(command, target_type, target_id)` rather than randomly generated, so
/// re-evaluating the same mutation yields the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalId(pub Uuid);

impl ApprovalId {
    /// UUID v5 namespace reserved for approval ticket ids.
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x9e, 0x6f, 0x4a, 0x22, 0x3b, 0x4e, 0x4c, 0x86, 0xa3, 0x0c, 0x60, 0x0e, 0x9a, 0x1a, 0x5a,
        0x5f,
    ]);

    /// Derive the ticket id for a `(command, target_type, target_id)`
    /// triple. Calling this twice with the same triple returns the same
    /// id, matching the "minted deterministically" requirement.
    pub fn derive(command: &str, target_type: &str, target_id: &str) -> Self {
        let key = format!("{command}\u{0}{target_type}\u{0}{target_id}");
        Self(Uuid::new_v5(&Self::NAMESPACE, key.as_bytes()))
    }
}

impl fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A minted authorization for a specific `(command, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTicket {
    /// Deterministic ticket id.
    pub id: ApprovalId,
    /// The command text this ticket authorizes.
    pub command: String,
    /// Kind of the target resource, e.g. `docker_container`.
    pub target_type: String,
    /// Canonical id of the target resource.
    pub target_id: String,
    /// Hostname of the agent that will execute the command, when known.
    pub agent_hostname: Option<String>,
    /// Operator-facing description of what this ticket authorizes.
    pub description: String,
    /// When the ticket was minted.
    pub created_at: DateTime<Utc>,
}

impl ApprovalTicket {
    /// Mint a ticket, deriving its id from the `(command, target_type,
    /// target_id)` triple.
    pub fn mint(
        command: impl Into<String>,
        target_type: impl Into<String>,
        target_id: impl Into<String>,
        agent_hostname: Option<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let command = command.into();
        let target_type = target_type.into();
        let target_id = target_id.into();
        let id = ApprovalId::derive(&command, &target_type, &target_id);
        Self {
            id,
            command,
            target_type,
            target_id,
            agent_hostname,
            description: description.into(),
            created_at,
        }
    }
}

/// Control level governing tool visibility and the approval lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    /// Mutating tools are hidden from listings and refused if invoked.
    ReadOnly,
    /// Mutating tools require an approval round-trip.
    Controlled,
    /// Policy-evaluated only; no operator confirmation.
    Autonomous,
}

impl ControlLevel {
    /// Whether mutating tools should be hidden/refused entirely.
    pub fn is_read_only(self) -> bool {
        matches!(self, ControlLevel::ReadOnly)
    }

    /// Whether mutating operations must mint an approval ticket
    /// unconditionally (independent of the policy decision).
    pub fn requires_unconditional_approval(self) -> bool {
        matches!(self, ControlLevel::Controlled)
    }
}

impl Default for ControlLevel {
    fn default() -> Self {
        ControlLevel::Controlled
    }
}

impl fmt::Display for ControlLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControlLevel::ReadOnly => "read_only",
            ControlLevel::Controlled => "controlled",
            ControlLevel::Autonomous => "autonomous",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resource() -> ResolvedResource {
        ResolvedResource {
            kind: ResourceKind::DockerContainer,
            provider_uid: Some("abc123".to_string()),
            name: "jellyfin".to_string(),
            aliases: BTreeSet::from(["jellyfin".to_string()]),
            host_uid: Some("delly".to_string()),
            host_name: Some("delly".to_string()),
            location_chain: vec!["node:delly".to_string(), "docker:jellyfin".to_string()],
            executors: vec![ExecutorRef {
                executor_id: "delly-agent".to_string(),
                adapter: Adapter::Docker,
                actions: vec!["query".to_string(), "restart".to_string()],
                priority: 10,
            }],
        }
    }

    #[test]
    fn canonical_id_scoped() {
        let r = sample_resource();
        assert_eq!(r.canonical_id(), "docker_container:delly:abc123");
    }

    #[test]
    fn canonical_id_unscoped_falls_back_to_name() {
        let mut r = sample_resource();
        r.kind = ResourceKind::Node;
        r.provider_uid = None;
        assert_eq!(r.canonical_id(), "node:jellyfin");
    }

    #[test]
    fn allowed_actions_union() {
        let r = sample_resource();
        assert!(r.allowed_actions().contains("restart"));
        assert!(r.allows_action("query"));
        assert!(!r.allows_action("exec"));
    }

    #[test]
    fn approval_id_is_deterministic() {
        let a = ApprovalId::derive("restart", "docker_container", "docker_container:delly:abc123");
        let b = ApprovalId::derive("restart", "docker_container", "docker_container:delly:abc123");
        assert_eq!(a, b);
        let c = ApprovalId::derive("stop", "docker_container", "docker_container:delly:abc123");
        assert_ne!(a, c);
    }
}

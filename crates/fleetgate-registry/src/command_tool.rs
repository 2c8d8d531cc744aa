//! Command-execution tools: a read-only `inspect` handler and the
//! mutating `run_command` handler, both built over [`GatingContext`].
//!
//! The split mirrors the control-level gate itself: a provably
//! read-only command never needs to cross the policy pipeline, so it
//! gets its own always-visible tool rather than threading a bypass
//! through the mutating path.

use std::sync::Arc;

use async_trait::async_trait;
use fleetgate_classifier::classify;
use fleetgate_core::envelope::ToolEnvelope;
use fleetgate_core::providers::{AgentServer, Redactor};
use fleetgate_core::{GatingError, ResolvedResource};
use fleetgate_dispatch::Dispatcher;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::gate::{Gate, GatingContext, gate_read, gate_write};
use crate::tool::GatingTool;

fn resolve(context: &GatingContext, target_id: &str) -> Option<ResolvedResource> {
    context
        .resolution
        .lookup_by_id(target_id)
        .or_else(|| context.resolution.lookup_by_alias(target_id))
}

/// Run `command` against whichever executor is reachable for `resource`
/// (or, when the target was never discovered, directly against
/// `agent_hostname`), then redact the captured output.
async fn execute_and_redact(
    agent_server: &dyn AgentServer,
    redactor: &dyn Redactor,
    resource: Option<ResolvedResource>,
    host: Option<ResolvedResource>,
    action: &str,
    command: &str,
    agent_hostname: Option<&str>,
) -> Result<Value, GatingError> {
    let dispatcher = Dispatcher::new(agent_server);

    let result = match resource {
        Some(resource) => dispatcher
            .dispatch_with_cascade(&resource, action, command, |_host_id| host.as_ref())
            .await
            .map_err(|e| GatingError::Fatal { message: e.to_string() })?,
        None => {
            let agent_id = agent_hostname.ok_or_else(|| GatingError::InvalidArgument {
                message: "agent_hostname is required when the target was not discovered this session".to_string(),
            })?;
            agent_server
                .execute_command(agent_id, command, "unknown", "unknown")
                .await?
        }
    };

    let (stdout, stdout_count) = redactor.redact(&result.stdout);
    let (mut stderr, stderr_count) = redactor.redact(&result.stderr);
    let redacted = stdout_count + stderr_count;
    if redacted > 0 {
        stderr.push_str(&format!("\n[redacted {redacted} sensitive value(s)]"));
    }
    Ok(json!({ "stdout": stdout, "stderr": stderr, "exit_code": result.exit_code }))
}

#[derive(Debug, Deserialize)]
struct InspectArgs {
    command: String,
    target_id: String,
    #[serde(default)]
    agent_hostname: Option<String>,
}

/// Executes a command the classifier can prove is read-only. Never
/// hidden by the control-level gate: read-only inspection carries no
/// mutation risk regardless of how cautious the host is configured.
pub struct InspectTool {
    context: Arc<GatingContext>,
    agent_server: Arc<dyn AgentServer>,
    redactor: Arc<dyn Redactor>,
}

impl InspectTool {
    /// Build the tool over the shared gating context, agent server and
    /// output redactor.
    #[must_use]
    pub fn new(context: Arc<GatingContext>, agent_server: Arc<dyn AgentServer>, redactor: Arc<dyn Redactor>) -> Self {
        Self {
            context,
            agent_server,
            redactor,
        }
    }
}

#[async_trait]
impl GatingTool for InspectTool {
    fn name(&self) -> &'static str {
        "inspect"
    }

    fn description(&self) -> &'static str {
        "Run a read-only command against a fleet resource and return its output."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {"type": "string"},
                "target_id": {"type": "string"},
                "agent_hostname": {"type": "string"},
            },
            "required": ["command", "target_id"],
        })
    }

    fn require_control(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> ToolEnvelope {
        let args: InspectArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolEnvelope::error(&GatingError::InvalidArgument { message: e.to_string() }),
        };

        let intent = classify(&args.command);
        if !intent.intent.is_read_only() {
            return ToolEnvelope::error(&GatingError::PolicyBlocked {
                reason: "inspect only accepts commands the classifier can prove are read-only; use run_command"
                    .to_string(),
            });
        }

        let warning = match gate_read(&self.context, &args.command, &args.target_id) {
            Ok(warning) => warning,
            Err(err) => return ToolEnvelope::error(&err),
        };

        let resource = resolve(&self.context, &args.target_id);
        let host = resource
            .as_ref()
            .and_then(|r| r.host_uid.as_deref())
            .and_then(|host_id| resolve(&self.context, host_id));

        match execute_and_redact(
            self.agent_server.as_ref(),
            self.redactor.as_ref(),
            resource,
            host,
            "inspect",
            &args.command,
            args.agent_hostname.as_deref(),
        )
        .await
        {
            Ok(mut body) => {
                if let (Some(warning), Value::Object(map)) = (warning, &mut body) {
                    map.insert("warning".to_string(), json!(warning));
                }
                ToolEnvelope::json(&body)
            }
            Err(err) => ToolEnvelope::error(&err),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    command: String,
    target_type: String,
    target_id: String,
    action: String,
    #[serde(default)]
    agent_hostname: Option<String>,
    #[serde(default)]
    pre_approved: bool,
}

/// Executes a mutating (or not provably read-only) command against a
/// resolved fleet resource, gated by strict resolution, the routing
/// guard, and the approval/control-level pipeline.
pub struct RunCommandTool {
    context: Arc<GatingContext>,
    agent_server: Arc<dyn AgentServer>,
    redactor: Arc<dyn Redactor>,
}

impl RunCommandTool {
    /// Build the tool over the shared gating context, agent server and
    /// output redactor.
    #[must_use]
    pub fn new(context: Arc<GatingContext>, agent_server: Arc<dyn AgentServer>, redactor: Arc<dyn Redactor>) -> Self {
        Self {
            context,
            agent_server,
            redactor,
        }
    }
}

#[async_trait]
impl GatingTool for RunCommandTool {
    fn name(&self) -> &'static str {
        "run_command"
    }

    fn description(&self) -> &'static str {
        "Execute a shell command against a fleet resource, subject to the full safety gate."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {"type": "string"},
                "target_type": {"type": "string"},
                "target_id": {"type": "string"},
                "action": {"type": "string"},
                "agent_hostname": {"type": "string"},
                "pre_approved": {"type": "boolean"},
            },
            "required": ["command", "target_type", "target_id", "action"],
        })
    }

    fn require_control(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> ToolEnvelope {
        let args: RunCommandArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolEnvelope::error(&GatingError::InvalidArgument { message: e.to_string() }),
        };

        let gate = gate_write(
            &self.context,
            "run_command",
            &args.command,
            &args.target_type,
            &args.target_id,
            &args.action,
            args.agent_hostname.clone(),
            args.pre_approved,
        );

        let warning = match gate {
            Gate::Blocked(err) => return ToolEnvelope::error(&err),
            Gate::ApprovalRequired(ticket) => {
                return ToolEnvelope::approval_required(
                    &ticket,
                    json!({
                        "action": args.action,
                        "target_type": args.target_type,
                        "target_id": args.target_id,
                        "command": args.command,
                    }),
                );
            }
            Gate::Dispatch { warning } => warning,
        };

        let resource = resolve(&self.context, &args.target_id);
        let host = resource
            .as_ref()
            .and_then(|r| r.host_uid.as_deref())
            .and_then(|host_id| resolve(&self.context, host_id));

        match execute_and_redact(
            self.agent_server.as_ref(),
            self.redactor.as_ref(),
            resource,
            host,
            &args.action,
            &args.command,
            args.agent_hostname.as_deref(),
        )
        .await
        {
            Ok(mut body) => {
                if let (Some(warning), Value::Object(map)) = (warning, &mut body) {
                    map.insert("warning".to_string(), json!(warning));
                }
                ToolEnvelope::json(&body)
            }
            Err(err) => ToolEnvelope::error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetgate_config::GatingConfig;
    use fleetgate_core::providers::AgentExecutionResult;
    use fleetgate_telemetry::Counters;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    struct NoopRedactor;
    impl Redactor for NoopRedactor {
        fn redact(&self, text: &str) -> (String, usize) {
            (text.to_string(), 0)
        }
    }

    struct FakeAgent {
        last_command: Mutex<Option<String>>,
    }

    #[async_trait]
    impl AgentServer for FakeAgent {
        async fn connected_agents(&self) -> fleetgate_core::GatingResult<Vec<String>> {
            Ok(vec!["delly".to_string()])
        }

        async fn execute_command(
            &self,
            _agent_id: &str,
            command: &str,
            _target_type: &str,
            _target_id: &str,
        ) -> fleetgate_core::GatingResult<AgentExecutionResult> {
            *self.last_command.lock().unwrap() = Some(command.to_string());
            Ok(AgentExecutionResult {
                stdout: "ok".to_string(),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    fn context(control_level: fleetgate_core::ControlLevel) -> Arc<GatingContext> {
        let mut config = GatingConfig::default();
        config.control_level = control_level;
        config.strict_resolution = false;
        Arc::new(GatingContext::new(&config, Arc::new(Counters::new())))
    }

    fn docker_container() -> ResolvedResource {
        ResolvedResource {
            kind: fleetgate_core::ResourceKind::DockerContainer,
            provider_uid: Some("jellyfin".to_string()),
            name: "jellyfin".to_string(),
            aliases: BTreeSet::from(["jellyfin".to_string()]),
            host_uid: Some("delly".to_string()),
            host_name: Some("delly".to_string()),
            location_chain: vec!["node:delly".to_string()],
            executors: vec![],
        }
    }

    #[tokio::test]
    async fn inspect_refuses_non_read_only_commands() {
        let context = context(fleetgate_core::ControlLevel::ReadOnly);
        let agent = Arc::new(FakeAgent { last_command: Mutex::new(None) });
        let tool = InspectTool::new(context, agent, Arc::new(NoopRedactor));
        let result = tool
            .execute(json!({"command": "docker restart jellyfin", "target_id": "node:delly"}))
            .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn inspect_runs_read_only_command_against_undiscovered_host_with_warning() {
        let context = context(fleetgate_core::ControlLevel::ReadOnly);
        context.resolution.register(docker_container());
        let agent = Arc::new(FakeAgent { last_command: Mutex::new(None) });
        let tool = InspectTool::new(context, agent, Arc::new(NoopRedactor));
        let result = tool
            .execute(json!({"command": "cat /etc/os-release", "target_id": "node:unseen", "agent_hostname": "delly"}))
            .await;
        assert_eq!(result.is_error, None);
    }

    #[tokio::test]
    async fn run_command_requires_approval_in_controlled_mode() {
        let context = context(fleetgate_core::ControlLevel::Controlled);
        let id = context.resolution.register(docker_container());
        let agent = Arc::new(FakeAgent { last_command: Mutex::new(None) });
        let tool = RunCommandTool::new(context, agent, Arc::new(NoopRedactor));
        let result = tool
            .execute(json!({
                "command": "docker restart jellyfin",
                "target_type": "docker_container",
                "target_id": id,
                "action": "restart",
            }))
            .await;
        let text = match &result.content[0] {
            fleetgate_core::envelope::ContentBlock::Text { text } => text.clone(),
        };
        assert!(text.starts_with("APPROVAL_REQUIRED: "));
    }

    #[tokio::test]
    async fn run_command_dispatches_when_pre_approved() {
        let context = context(fleetgate_core::ControlLevel::Controlled);
        let id = context.resolution.register(docker_container());
        let agent = Arc::new(FakeAgent { last_command: Mutex::new(None) });
        let tool = RunCommandTool::new(context, agent.clone(), Arc::new(NoopRedactor));
        let result = tool
            .execute(json!({
                "command": "docker restart jellyfin",
                "target_type": "docker_container",
                "target_id": id,
                "action": "restart",
                "pre_approved": true,
            }))
            .await;
        assert_eq!(result.is_error, None);
        assert_eq!(agent.last_command.lock().unwrap().as_deref(), Some("docker restart jellyfin"));
    }
}

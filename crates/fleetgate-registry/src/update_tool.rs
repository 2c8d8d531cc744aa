//! Docker image update tools wrapping [`UpdatesProvider`], composing the
//! approval/control-level gate with the dispatcher's fixed queue-retry
//! contract.

use std::sync::Arc;

use async_trait::async_trait;
use fleetgate_core::envelope::ToolEnvelope;
use fleetgate_core::providers::{CommandStatus, UpdatesProvider};
use fleetgate_core::GatingError;
use fleetgate_dispatch::retry::{is_transient_message, retry, RetryConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::gate::{Gate, GatingContext, gate_write};
use crate::tool::GatingTool;

fn dispatch_error_to_gating(err: fleetgate_dispatch::DispatchError) -> GatingError {
    match err {
        fleetgate_dispatch::DispatchError::RetriesExhausted { message, .. } => GatingError::Transient { message },
        other => GatingError::Fatal { message: other.to_string() },
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
struct StatusBody<'a> {
    success: bool,
    status: &'a CommandStatus,
}

fn status_body(status: CommandStatus) -> Value {
    let success = matches!(status, CommandStatus::Succeeded);
    json!(StatusBody { success, status: &status })
}

#[derive(Debug, Deserialize)]
struct ListUpdatesArgs {
    host_id: String,
}

/// Read-only listing of updates pending on a Docker host.
pub struct ListUpdatesTool {
    updates: Arc<dyn UpdatesProvider>,
}

impl ListUpdatesTool {
    /// Build the tool over the shared updates provider.
    #[must_use]
    pub fn new(updates: Arc<dyn UpdatesProvider>) -> Self {
        Self { updates }
    }
}

#[async_trait]
impl GatingTool for ListUpdatesTool {
    fn name(&self) -> &'static str {
        "list_pending_updates"
    }

    fn description(&self) -> &'static str {
        "List Docker image updates pending on a host."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"host_id": {"type": "string"}},
            "required": ["host_id"],
        })
    }

    fn require_control(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> ToolEnvelope {
        let args: ListUpdatesArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolEnvelope::error(&GatingError::InvalidArgument { message: e.to_string() }),
        };
        match self.updates.pending_updates(&args.host_id).await {
            Ok(value) => ToolEnvelope::json(&value),
            Err(err) => ToolEnvelope::error(&err),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateContainerArgs {
    host_id: String,
    container_id: String,
    container_name: String,
    target_id: String,
    #[serde(default)]
    agent_hostname: Option<String>,
    #[serde(default)]
    pre_approved: bool,
}

/// Queues an image update for a single Docker container, subject to the
/// approval/control-level gate and the dispatcher's fixed 3-attempt
/// queue-retry contract for transient queue failures.
pub struct UpdateContainerTool {
    context: Arc<GatingContext>,
    updates: Arc<dyn UpdatesProvider>,
}

impl UpdateContainerTool {
    /// Build the tool over the shared gating context and updates
    /// provider.
    #[must_use]
    pub fn new(context: Arc<GatingContext>, updates: Arc<dyn UpdatesProvider>) -> Self {
        Self { context, updates }
    }
}

#[async_trait]
impl GatingTool for UpdateContainerTool {
    fn name(&self) -> &'static str {
        "update_container"
    }

    fn description(&self) -> &'static str {
        "Queue a Docker image update for a container."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "host_id": {"type": "string"},
                "container_id": {"type": "string"},
                "container_name": {"type": "string"},
                "target_id": {"type": "string"},
                "agent_hostname": {"type": "string"},
                "pre_approved": {"type": "boolean"},
            },
            "required": ["host_id", "container_id", "container_name", "target_id"],
        })
    }

    fn require_control(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> ToolEnvelope {
        let args: UpdateContainerArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolEnvelope::error(&GatingError::InvalidArgument { message: e.to_string() }),
        };

        if !self.updates.is_update_actions_enabled() {
            return ToolEnvelope::error(&GatingError::PolicyBlocked {
                reason: "update actions are disabled on this host".to_string(),
            });
        }

        let command = format!("docker update {}", args.container_name);
        let gate = gate_write(
            &self.context,
            "update_container",
            &command,
            "docker_container",
            &args.target_id,
            "update",
            args.agent_hostname.clone(),
            args.pre_approved,
        );

        match gate {
            Gate::Blocked(err) => ToolEnvelope::error(&err),
            Gate::ApprovalRequired(ticket) => ToolEnvelope::approval_required(
                &ticket,
                json!({
                    "action": "update",
                    "container_name": args.container_name,
                    "docker_host": args.host_id,
                }),
            ),
            Gate::Dispatch { .. } => {
                let token = CancellationToken::new();
                let counters = self.context.counters.clone();
                let updates = self.updates.clone();
                let host_id = args.host_id.clone();
                let container_id = args.container_id.clone();
                let container_name = args.container_name.clone();

                let result = retry(
                    &RetryConfig::queue(),
                    &token,
                    "update_container",
                    move |attempt| {
                        let counters = counters.clone();
                        let updates = updates.clone();
                        let host_id = host_id.clone();
                        let container_id = container_id.clone();
                        let container_name = container_name.clone();
                        async move {
                            if attempt > 0 {
                                counters.increment("command_retry", &[("operation", "update_container")]);
                            }
                            updates.update_container(&host_id, &container_id, &container_name).await
                        }
                    },
                    |e: &GatingError| is_transient_message(&e.to_string()),
                )
                .await;

                match result {
                    Ok(status) => ToolEnvelope::json(&status_body(status)),
                    Err(err) => ToolEnvelope::error(&dispatch_error_to_gating(err)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetgate_config::GatingConfig;
    use fleetgate_telemetry::Counters;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyUpdates {
        calls: AtomicU32,
        fail_until: u32,
        enabled: bool,
    }

    #[async_trait]
    impl UpdatesProvider for FlakyUpdates {
        async fn pending_updates(&self, _host_id: &str) -> fleetgate_core::GatingResult<Value> {
            Ok(json!({"updates": []}))
        }

        async fn trigger_update_check(&self, _host_id: &str) -> fleetgate_core::GatingResult<CommandStatus> {
            Ok(CommandStatus::Queued)
        }

        async fn update_container(
            &self,
            _host_id: &str,
            _container_id: &str,
            _name: &str,
        ) -> fleetgate_core::GatingResult<CommandStatus> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_until {
                return Err(GatingError::Transient {
                    message: "database is locked".to_string(),
                });
            }
            Ok(CommandStatus::Succeeded)
        }

        fn is_update_actions_enabled(&self) -> bool {
            self.enabled
        }
    }

    fn context() -> Arc<GatingContext> {
        let mut config = GatingConfig::default();
        config.control_level = fleetgate_core::ControlLevel::Autonomous;
        config.strict_resolution = false;
        Arc::new(GatingContext::new(&config, Arc::new(Counters::new())))
    }

    #[tokio::test]
    async fn update_succeeds_after_two_transient_failures() {
        let start = tokio::time::Instant::now();
        let updates = Arc::new(FlakyUpdates {
            calls: AtomicU32::new(0),
            fail_until: 2,
            enabled: true,
        });
        let tool = UpdateContainerTool::new(context(), updates);
        let result = tool
            .execute(json!({
                "host_id": "delly",
                "container_id": "abc",
                "container_name": "jellyfin",
                "target_id": "docker_container:delly:abc",
            }))
            .await;
        assert_eq!(result.is_error, None);
        assert!(start.elapsed() >= std::time::Duration::from_millis(75));
    }

    #[tokio::test]
    async fn update_refused_when_actions_disabled() {
        let updates = Arc::new(FlakyUpdates {
            calls: AtomicU32::new(0),
            fail_until: 0,
            enabled: false,
        });
        let tool = UpdateContainerTool::new(context(), updates);
        let result = tool
            .execute(json!({
                "host_id": "delly",
                "container_id": "abc",
                "container_name": "jellyfin",
                "target_id": "docker_container:delly:abc",
            }))
            .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn update_requires_approval_in_controlled_mode() {
        let mut config = GatingConfig::default();
        config.control_level = fleetgate_core::ControlLevel::Controlled;
        config.strict_resolution = false;
        let context = Arc::new(GatingContext::new(&config, Arc::new(Counters::new())));
        let updates = Arc::new(FlakyUpdates {
            calls: AtomicU32::new(0),
            fail_until: 0,
            enabled: true,
        });
        let tool = UpdateContainerTool::new(context, updates);
        let result = tool
            .execute(json!({
                "host_id": "delly",
                "container_id": "abc",
                "container_name": "jellyfin",
                "target_id": "docker_container:delly:abc",
            }))
            .await;
        let text = match &result.content[0] {
            fleetgate_core::envelope::ContentBlock::Text { text } => text.clone(),
        };
        assert!(text.starts_with("APPROVAL_REQUIRED: "));
        assert!(text.contains("\"action\":\"update\""));
        assert!(text.contains("\"container_name\":\"jellyfin\""));
    }
}

//! Mock implementations of the gating core's narrow collaborator traits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fleetgate_core::error::GatingResult;
use fleetgate_core::providers::{
    AgentExecutionResult, AgentServer, CommandStatus, PolicyEvaluator, Redactor, StateProvider, TelemetrySink,
    UpdatesProvider,
};
use fleetgate_core::types::PolicyDecision;
use fleetgate_core::GatingError;
use serde_json::Value;

/// Records every command dispatched to it and returns a queued or
/// default [`AgentExecutionResult`].
pub struct FakeAgentServer {
    connected: Vec<String>,
    responses: Mutex<VecDeque<GatingResult<AgentExecutionResult>>>,
    calls: Mutex<Vec<(String, String, String, String)>>,
}

impl FakeAgentServer {
    /// Build a fake agent server that reports `connected` as its
    /// connected agent ids and always succeeds with an empty result
    /// unless a response is queued via [`FakeAgentServer::queue_result`]
    /// or [`FakeAgentServer::queue_error`].
    #[must_use]
    pub fn new(connected: Vec<String>) -> Self {
        Self {
            connected,
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful result for the next `execute_command` call.
    pub fn queue_result(&self, result: AgentExecutionResult) {
        self.responses.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a failure for the next `execute_command` call.
    pub fn queue_error(&self, err: GatingError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Every `(agent_id, command, target_type, target_id)` tuple seen so
    /// far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentServer for FakeAgentServer {
    async fn connected_agents(&self) -> GatingResult<Vec<String>> {
        Ok(self.connected.clone())
    }

    async fn execute_command(
        &self,
        agent_id: &str,
        command: &str,
        target_type: &str,
        target_id: &str,
    ) -> GatingResult<AgentExecutionResult> {
        self.calls.lock().unwrap().push((
            agent_id.to_string(),
            command.to_string(),
            target_type.to_string(),
            target_id.to_string(),
        ));
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(AgentExecutionResult {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            })
        })
    }
}

/// An updates provider that fails with a transient "database is locked"
/// error on its first `fail_until` calls to `update_container`, then
/// succeeds.
pub struct FakeUpdatesProvider {
    calls: AtomicU32,
    fail_until: u32,
    enabled: bool,
    pending: Value,
}

impl FakeUpdatesProvider {
    /// Build a fake that always succeeds and reports updates enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_until: 0,
            enabled: true,
            pending: serde_json::json!({ "updates": [] }),
        }
    }

    /// Fail the first `n` calls to `update_container` with a transient
    /// error before succeeding.
    #[must_use]
    pub fn failing_until(mut self, n: u32) -> Self {
        self.fail_until = n;
        self
    }

    /// Report update actions as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the JSON body returned from `pending_updates`.
    #[must_use]
    pub fn with_pending(mut self, pending: Value) -> Self {
        self.pending = pending;
        self
    }

    /// Number of `update_container` calls observed so far.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeUpdatesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdatesProvider for FakeUpdatesProvider {
    async fn pending_updates(&self, _host_id: &str) -> GatingResult<Value> {
        Ok(self.pending.clone())
    }

    async fn trigger_update_check(&self, _host_id: &str) -> GatingResult<CommandStatus> {
        Ok(CommandStatus::Queued)
    }

    async fn update_container(&self, _host_id: &str, _container_id: &str, _name: &str) -> GatingResult<CommandStatus> {
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

/// Passes text through unchanged; for tools that gate on redaction
/// happening without caring what was redacted.
pub struct NoopRedactor;

impl Redactor for NoopRedactor {
    fn redact(&self, text: &str) -> (String, usize) {
        (text.to_string(), 0)
    }
}

/// Always reports `needle` as redacted out of any text containing it.
pub struct SubstringRedactor {
    /// The substring to scrub from redacted text.
    pub needle: &'static str,
}

impl Redactor for SubstringRedactor {
    fn redact(&self, text: &str) -> (String, usize) {
        if text.contains(self.needle) {
            (text.replace(self.needle, "[redacted]"), 1)
        } else {
            (text.to_string(), 0)
        }
    }
}

/// Returns a fixed [`PolicyDecision`] for every command.
pub struct FixedPolicyEvaluator(pub PolicyDecision);

#[async_trait]
impl PolicyEvaluator for FixedPolicyEvaluator {
    async fn evaluate(&self, _command: &str) -> GatingResult<PolicyDecision> {
        Ok(self.0)
    }
}

/// Returns a fixed JSON snapshot for every collection queried.
pub struct FixedStateProvider(pub Value);

#[async_trait]
impl StateProvider for FixedStateProvider {
    async fn snapshot(&self, _collection: &str) -> GatingResult<Value> {
        Ok(self.0.clone())
    }
}

/// Counts increments in memory, queryable by name and exact label set.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RecordingSink {
    /// Build an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `name` was incremented with exactly `labels`.
    #[must_use]
    pub fn count(&self, name: &str, labels: &[(&str, &str)]) -> usize {
        let labels: Vec<(String, String)> = labels.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, l)| n == name && *l == labels)
            .count()
    }
}

impl TelemetrySink for RecordingSink {
    fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        let labels = labels.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        self.events.lock().unwrap().push((name.to_string(), labels));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_agent_server_records_calls_and_queued_results() {
        let agent = FakeAgentServer::new(vec!["delly".to_string()]);
        agent.queue_result(AgentExecutionResult {
            stdout: "ok".to_string(),
            stderr: String::new(),
            exit_code: 0,
        });

        let result = agent.execute_command("delly", "uptime", "node", "node:delly").await.unwrap();
        assert_eq!(result.stdout, "ok");
        assert_eq!(
            agent.calls(),
            vec![("delly".to_string(), "uptime".to_string(), "node".to_string(), "node:delly".to_string())]
        );
    }

    #[tokio::test]
    async fn fake_updates_provider_recovers_after_failures() {
        let updates = FakeUpdatesProvider::new().failing_until(2);
        assert!(updates.update_container("delly", "jellyfin", "jellyfin").await.is_err());
        assert!(updates.update_container("delly", "jellyfin", "jellyfin").await.is_err());
        assert!(updates.update_container("delly", "jellyfin", "jellyfin").await.is_ok());
        assert_eq!(updates.call_count(), 3);
    }

    #[test]
    fn recording_sink_counts_by_exact_label_set() {
        let sink = RecordingSink::new();
        sink.increment("routing_mismatch_block", &[("target_kind", "node"), ("child_kind", "lxc")]);
        assert_eq!(
            sink.count("routing_mismatch_block", &[("target_kind", "node"), ("child_kind", "lxc")]),
            1
        );
        assert_eq!(sink.count("routing_mismatch_block", &[("target_kind", "vm"), ("child_kind", "lxc")]), 0);
    }
}

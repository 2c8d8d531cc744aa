//! Ties executor routing, retry, and post-state verification together
//! around an [`AgentServer`].
//!
//! Given a resolved target and an action, the dispatcher picks the
//! highest-priority executor that declares the action (cascading to a
//! parent Docker host when the target is a nested container), runs the
//! command over the agent RPC, and — when asked — polls a verification
//! command until it confirms the expected post-state.

use fleetgate_core::providers::{AgentExecutionResult, AgentServer};
use fleetgate_core::{ExecutorRef, ResolvedResource};
use tokio_util::sync::CancellationToken;

use crate::error::{DispatchError, DispatchResult};
use crate::retry::{self, RetryConfig};
use crate::routing::{self, no_agent_message};
use crate::verify::verify_post_state;

/// Dispatches commands to the executor selected for a resolved target.
pub struct Dispatcher<'a> {
    agent_server: &'a dyn AgentServer,
}

impl<'a> Dispatcher<'a> {
    /// Build a dispatcher over `agent_server`.
    #[must_use]
    pub fn new(agent_server: &'a dyn AgentServer) -> Self {
        Self { agent_server }
    }

    /// Run `command` against the highest-priority executor on `resource`
    /// that declares `action`, without cascading to a parent host.
    pub async fn dispatch(
        &self,
        resource: &ResolvedResource,
        action: &str,
        command: &str,
    ) -> DispatchResult<AgentExecutionResult> {
        let executor = routing::select_executor(resource, action)
            .ok_or_else(|| DispatchError::NoAgent(no_agent_message(resource)))?;
        self.execute_via(executor, resource, command).await
    }

    /// Run `command`, cascading to the enclosing host's executors for a
    /// Docker container with none of its own. See
    /// [`routing::select_executor_with_cascade`].
    pub async fn dispatch_with_cascade(
        &self,
        resource: &'a ResolvedResource,
        action: &str,
        command: &str,
        lookup_host: impl FnOnce(&str) -> Option<&'a ResolvedResource>,
    ) -> DispatchResult<AgentExecutionResult> {
        let (owner, executor) = routing::select_executor_with_cascade(resource, action, lookup_host)
            .ok_or_else(|| DispatchError::NoAgent(no_agent_message(resource)))?;
        self.execute_via(executor, owner, command).await
    }

    /// Run `command` via `executor`, then poll `verify_command` up to 3
    /// times with a settle window until `expect_success` matches the
    /// verification command's exit code (`0` is success).
    pub async fn dispatch_and_verify(
        &self,
        resource: &ResolvedResource,
        action: &str,
        command: &str,
        verify_command: &str,
        expect_success: bool,
    ) -> DispatchResult<AgentExecutionResult> {
        let executor = routing::select_executor(resource, action)
            .ok_or_else(|| DispatchError::NoAgent(no_agent_message(resource)))?;
        let result = self.execute_via(executor, resource, command).await?;

        verify_post_state(action, || async {
            let verification = self.execute_via(executor, resource, verify_command).await?;
            Ok((verification.exit_code == 0) == expect_success)
        })
        .await?;

        Ok(result)
    }

    /// Run a queue-style operation (update check, container update
    /// enqueue) with the fixed queue-retry contract, aborting early on
    /// cancellation via `token`.
    pub async fn dispatch_with_retry<T, E, Fut, F, P>(
        &self,
        token: &CancellationToken,
        operation_name: &str,
        operation: F,
        should_retry: P,
    ) -> DispatchResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        retry::retry(&RetryConfig::queue(), token, operation_name, operation, should_retry).await
    }

    async fn execute_via(
        &self,
        executor: &ExecutorRef,
        resource: &ResolvedResource,
        command: &str,
    ) -> DispatchResult<AgentExecutionResult> {
        self.agent_server
            .execute_command(&executor.executor_id, command, &resource.kind.label(), &resource.canonical_id())
            .await
            .map_err(|e| DispatchError::Agent(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fleetgate_core::types::Adapter;
    use fleetgate_core::{GatingResult, ResourceKind};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeAgentServer {
        calls: AtomicU32,
        fail_until: u32,
    }

    #[async_trait]
    impl AgentServer for FakeAgentServer {
        async fn connected_agents(&self) -> GatingResult<Vec<String>> {
            Ok(vec!["agent-1".to_string()])
        }

        async fn execute_command(
            &self,
            _agent_id: &str,
            command: &str,
            _target_type: &str,
            _target_id: &str,
        ) -> GatingResult<AgentExecutionResult> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if command == "docker inspect jellyfin" {
                let running = n >= self.fail_until;
                return Ok(AgentExecutionResult {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: i32::from(!running),
                });
            }
            Ok(AgentExecutionResult {
                stdout: "ok".to_string(),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    fn resource(kind: ResourceKind, executors: Vec<ExecutorRef>) -> ResolvedResource {
        ResolvedResource {
            kind,
            provider_uid: Some("100".to_string()),
            name: "jellyfin".to_string(),
            aliases: BTreeSet::new(),
            host_uid: None,
            host_name: None,
            location_chain: Vec::new(),
            executors,
        }
    }

    fn executor(actions: &[&str]) -> ExecutorRef {
        ExecutorRef {
            executor_id: "agent-1".to_string(),
            adapter: Adapter::Docker,
            actions: actions.iter().map(|a| a.to_string()).collect(),
            priority: 1,
        }
    }

    #[tokio::test]
    async fn dispatch_runs_command_via_selected_executor() {
        let agent = FakeAgentServer {
            calls: AtomicU32::new(0),
            fail_until: 0,
        };
        let dispatcher = Dispatcher::new(&agent);
        let resource = resource(ResourceKind::DockerContainer, vec![executor(&["start"])]);
        let result = dispatcher.dispatch(&resource, "start", "docker start jellyfin").await.unwrap();
        assert_eq!(result.stdout, "ok");
    }

    #[tokio::test]
    async fn dispatch_fails_without_matching_executor() {
        let agent = FakeAgentServer {
            calls: AtomicU32::new(0),
            fail_until: 0,
        };
        let dispatcher = Dispatcher::new(&agent);
        let resource = resource(ResourceKind::DockerContainer, vec![]);
        let result = dispatcher.dispatch(&resource, "start", "docker start jellyfin").await;
        assert!(matches!(result, Err(DispatchError::NoAgent(_))));
    }

    #[tokio::test]
    async fn dispatch_and_verify_polls_until_expected_state() {
        let agent = FakeAgentServer {
            calls: AtomicU32::new(0),
            fail_until: 2,
        };
        let dispatcher = Dispatcher::new(&agent);
        let resource = resource(ResourceKind::DockerContainer, vec![executor(&["start"])]);
        let result = dispatcher
            .dispatch_and_verify(&resource, "start", "docker start jellyfin", "docker inspect jellyfin", true)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dispatch_with_cascade_reaches_host_executor() {
        let agent = FakeAgentServer {
            calls: AtomicU32::new(0),
            fail_until: 0,
        };
        let dispatcher = Dispatcher::new(&agent);
        let host = resource(ResourceKind::DockerHost, vec![executor(&["start"])]);
        let mut container = resource(ResourceKind::DockerContainer, vec![]);
        container.host_uid = Some("docker_host:delly".to_string());
        let result = dispatcher
            .dispatch_with_cascade(&container, "start", "docker start jellyfin", |_| Some(&host))
            .await;
        assert!(result.is_ok());
    }
}

//! Executor selection and parent-host cascade.
//!
//! Grounded on the registry's layered global-then-workspace fallback:
//! here the two layers are a resource's own executors and, for Docker
//! containers nested inside an LXC or VM, the enclosing host's.

use fleetgate_core::{ExecutorRef, ResolvedResource, ResourceKind};

/// The highest-priority executor on `resource` that allows `action`,
/// without any cascade.
#[must_use]
pub fn select_executor<'a>(resource: &'a ResolvedResource, action: &str) -> Option<&'a ExecutorRef> {
    resource.best_executor_for(action)
}

/// Resolve an executor for `resource`, cascading to the enclosing host's
/// executors when `resource` is a Docker container with none of its own
/// for `action` — the Docker-in-LXC/VM nesting case. `lookup_host`
/// resolves a host canonical id to its `ResolvedResource`, typically
/// backed by `fleetgate_resolution::ResolutionContext::lookup_by_id`.
pub fn select_executor_with_cascade<'a>(
    resource: &'a ResolvedResource,
    action: &str,
    lookup_host: impl FnOnce(&str) -> Option<&'a ResolvedResource>,
) -> Option<(&'a ResolvedResource, &'a ExecutorRef)> {
    if let Some(executor) = resource.best_executor_for(action) {
        return Some((resource, executor));
    }
    if matches!(resource.kind, ResourceKind::DockerContainer) {
        let host_uid = resource.host_uid.as_deref()?;
        let host = lookup_host(host_uid)?;
        let executor = host.best_executor_for(action)?;
        return Some((host, executor));
    }
    None
}

/// The operator-facing "no agent reachable" message, distinguishing a
/// Proxmox node/VM/LXC from a Docker host.
#[must_use]
pub fn no_agent_message(resource: &ResolvedResource) -> String {
    let canonical_id = resource.canonical_id();
    match resource.kind {
        ResourceKind::Node | ResourceKind::Vm | ResourceKind::Lxc | ResourceKind::Pbs => {
            format!("no agent reachable on Proxmox node for {canonical_id}")
        }
        ResourceKind::DockerHost | ResourceKind::DockerContainer => {
            format!("no agent reachable on Docker host for {canonical_id}")
        }
        ResourceKind::KubernetesResource(_) | ResourceKind::Storage => {
            format!("no agent reachable for {canonical_id}")
        }
    }
}

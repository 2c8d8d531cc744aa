//! Test fixtures for common gating-core types.

use std::collections::BTreeSet;

use fleetgate_core::{ApprovalTicket, ControlLevel, ExecutorRef, ResolvedResource, ResourceKind};

/// Build a node resource discovered under `uid`, with no enclosing host.
#[must_use]
pub fn node(uid: &str) -> ResolvedResource {
    ResolvedResource {
        kind: ResourceKind::Node,
        provider_uid: Some(uid.to_string()),
        name: uid.to_string(),
        aliases: BTreeSet::from([uid.to_string()]),
        host_uid: None,
        host_name: None,
        location_chain: vec![format!("node:{uid}")],
        executors: vec![ExecutorRef {
            executor_id: uid.to_string(),
            adapter: fleetgate_core::Adapter::Direct,
            actions: vec!["*".to_string()],
            priority: 0,
        }],
    }
}

/// Build an lxc resource scoped to `host`.
#[must_use]
pub fn lxc(host: &str, uid: &str) -> ResolvedResource {
    ResolvedResource {
        kind: ResourceKind::Lxc,
        provider_uid: Some(uid.to_string()),
        name: uid.to_string(),
        aliases: BTreeSet::from([uid.to_string()]),
        host_uid: Some(host.to_string()),
        host_name: Some(host.to_string()),
        location_chain: vec![format!("node:{host}")],
        executors: vec![ExecutorRef {
            executor_id: host.to_string(),
            adapter: fleetgate_core::Adapter::Pct,
            actions: vec!["*".to_string()],
            priority: 0,
        }],
    }
}

/// Build a vm resource scoped to `host`.
#[must_use]
pub fn vm(host: &str, uid: &str) -> ResolvedResource {
    ResolvedResource {
        kind: ResourceKind::Vm,
        provider_uid: Some(uid.to_string()),
        name: uid.to_string(),
        aliases: BTreeSet::from([uid.to_string()]),
        host_uid: Some(host.to_string()),
        host_name: Some(host.to_string()),
        location_chain: vec![format!("node:{host}")],
        executors: vec![ExecutorRef {
            executor_id: host.to_string(),
            adapter: fleetgate_core::Adapter::Qm,
            actions: vec!["*".to_string()],
            priority: 0,
        }],
    }
}

/// Build a docker container resource running on `host`, named `name`.
#[must_use]
pub fn docker_container(host: &str, name: &str) -> ResolvedResource {
    ResolvedResource {
        kind: ResourceKind::DockerContainer,
        provider_uid: Some(name.to_string()),
        name: name.to_string(),
        aliases: BTreeSet::from([name.to_string()]),
        host_uid: Some(host.to_string()),
        host_name: Some(host.to_string()),
        location_chain: vec![format!("node:{host}"), format!("docker:{name}")],
        executors: vec![ExecutorRef {
            executor_id: host.to_string(),
            adapter: fleetgate_core::Adapter::Docker,
            actions: vec!["*".to_string()],
            priority: 0,
        }],
    }
}

/// Mint a deterministic approval ticket for `(command, target_type,
/// target_id)`, useful for asserting on approval envelopes without
/// threading a live ticket-minting call through a test.
#[must_use]
pub fn ticket_for(command: &str, target_type: &str, target_id: &str) -> ApprovalTicket {
    ApprovalTicket::mint(command, target_type, target_id, None, command.to_string(), chrono::Utc::now())
}

/// The control levels a test should usually exercise together:
/// read-only, controlled, autonomous.
#[must_use]
pub fn all_control_levels() -> [ControlLevel; 3] {
    [ControlLevel::ReadOnly, ControlLevel::Controlled, ControlLevel::Autonomous]
}

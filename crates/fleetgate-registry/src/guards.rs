//! Strict-resolution and routing-mismatch guards composing the
//! Resolution Context (B) into the registry's gating path.

use std::time::Duration;

use fleetgate_core::{GatingError, ResolvedResource};
use fleetgate_resolution::ResolutionContext;

/// Refuse a mutating action against a resource the model never
/// discovered this session, when strict resolution is enabled.
#[must_use]
pub fn check_strict_resolution(
    resolution: &ResolutionContext,
    strict_resolution: bool,
    resource_id: &str,
    action: &str,
) -> Option<GatingError> {
    if !strict_resolution || resolution.lookup_by_id(resource_id).is_some() {
        return None;
    }
    Some(GatingError::StrictResolution {
        resource_id: resource_id.to_string(),
        action: action.to_string(),
        message: format!("{resource_id} was never discovered in this session; search or list first"),
    })
}

/// A narrow allowance (the "read-only exec bypass") to run a provably
/// read-only command against an undiscovered resource in strict mode,
/// as long as the session has discovered *something*. Returns a
/// warning message to surface to the model when the bypass applies.
#[must_use]
pub fn read_only_exec_bypass_warning(
    resolution: &ResolutionContext,
    strict_resolution: bool,
    resource_id: &str,
) -> Option<String> {
    if !strict_resolution || resolution.lookup_by_id(resource_id).is_some() {
        return None;
    }
    if !resolution.has_any_resources() {
        return None;
    }
    Some(format!(
        "warning: {resource_id} was not discovered this session; allowed because the command is read-only and other resources have already been discovered"
    ))
}

/// Refuse an operation targeting `target_host_id` directly when a more
/// specific child of that host was recently referenced explicitly.
#[must_use]
pub fn check_routing_mismatch(
    resolution: &ResolutionContext,
    target_host_id: &str,
    target_kind: &str,
    recent_access_window: Duration,
) -> Option<GatingError> {
    let children = resolution.recently_accessed_children(target_host_id, recent_access_window);
    if children.is_empty() {
        return None;
    }
    let more_specific_ids: Vec<String> = children.iter().map(ResolvedResource::canonical_id).collect();
    let child_kinds: Vec<String> = children.iter().map(|c| c.kind.label()).collect();
    Some(GatingError::RoutingMismatch {
        target_host: target_host_id.to_string(),
        more_specific_resources: more_specific_ids.clone(),
        more_specific_ids,
        child_kinds,
        message: format!(
            "{target_host_id} ({target_kind}) was targeted directly, but a more specific child resource was recently referenced"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetgate_core::ResourceKind;
    use std::collections::BTreeSet;

    fn lxc(host: &str, name: &str) -> ResolvedResource {
        ResolvedResource {
            kind: ResourceKind::Lxc,
            provider_uid: Some(name.to_string()),
            name: name.to_string(),
            aliases: BTreeSet::from([name.to_string()]),
            host_uid: Some(host.to_string()),
            host_name: Some(host.to_string()),
            location_chain: vec![format!("node:{host}")],
            executors: vec![],
        }
    }

    #[test]
    fn strict_resolution_blocks_undiscovered_targets() {
        let resolution = ResolutionContext::new();
        let err = check_strict_resolution(&resolution, true, "vm:999", "restart").unwrap();
        match err {
            GatingError::StrictResolution { resource_id, .. } => assert_eq!(resource_id, "vm:999"),
            other => panic!("expected StrictResolution, got {other:?}"),
        }
    }

    #[test]
    fn strict_resolution_allows_discovered_targets() {
        let resolution = ResolutionContext::new();
        let id = resolution.register(lxc("delly", "media-server"));
        assert!(check_strict_resolution(&resolution, true, &id, "restart").is_none());
    }

    #[test]
    fn read_only_bypass_applies_only_when_something_was_discovered() {
        let resolution = ResolutionContext::new();
        assert!(read_only_exec_bypass_warning(&resolution, true, "node:delly").is_none());
        resolution.register(lxc("delly", "media-server"));
        assert!(read_only_exec_bypass_warning(&resolution, true, "node:unseen").is_some());
    }

    #[test]
    fn routing_mismatch_fires_for_recently_accessed_children() {
        let resolution = ResolutionContext::new();
        resolution.register_with_explicit_access(lxc("delly", "media-server"));
        let err = check_routing_mismatch(&resolution, "node:delly", "node", Duration::from_secs(300)).unwrap();
        match err {
            GatingError::RoutingMismatch { more_specific_ids, child_kinds, .. } => {
                assert!(more_specific_ids.iter().any(|id| id.contains("media-server")));
                assert_eq!(child_kinds, vec!["lxc".to_string()]);
            }
            other => panic!("expected RoutingMismatch, got {other:?}"),
        }
    }

    #[test]
    fn routing_mismatch_is_silent_without_recent_children() {
        let resolution = ResolutionContext::new();
        resolution.register(lxc("delly", "media-server"));
        assert!(check_routing_mismatch(&resolution, "node:delly", "node", Duration::from_secs(300)).is_none());
    }
}

//! The session-scoped resolution context.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use fleetgate_core::ResolvedResource;

/// Default window for "recently referenced", matching the
/// `recent-access-window` configuration option's default.
pub const DEFAULT_RECENT_ACCESS_WINDOW: StdDuration = StdDuration::from_secs(5 * 60);

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Per-session catalog of resources the model has discovered, keyed by
/// alias and by canonical id, plus last-explicit-access timestamps.
///
/// Each table is guarded by its own lock so a lookup on one alias never
/// blocks on a concurrent registration touching an unrelated resource.
pub struct ResolutionContext {
    aliases: RwLock<HashMap<String, String>>,
    resources: RwLock<HashMap<String, ResolvedResource>>,
    explicit_access: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionContext {
    /// Create an empty context for a new session.
    pub fn new() -> Self {
        Self {
            aliases: RwLock::new(HashMap::new()),
            resources: RwLock::new(HashMap::new()),
            explicit_access: RwLock::new(HashMap::new()),
        }
    }

    /// Register a resource discovered via a list/search enumeration.
    /// Additive and idempotent on canonical id: re-registering merges new
    /// aliases into the existing entry rather than demoting or dropping
    /// the ones already known. Does not stamp an access timestamp.
    pub fn register(&self, resource: ResolvedResource) -> String {
        let canonical_id = resource.canonical_id();
        self.merge_resource(canonical_id.clone(), resource);
        canonical_id
    }

    /// Register a resource the model asked for by id or name directly
    /// (a single-resource "get", never a bulk listing), stamping its
    /// access timestamp to `now`.
    pub fn register_with_explicit_access(&self, resource: ResolvedResource) -> String {
        let canonical_id = self.register(resource);
        write(&self.explicit_access).insert(canonical_id.clone(), Utc::now());
        canonical_id
    }

    fn merge_resource(&self, canonical_id: String, resource: ResolvedResource) {
        let mut resources = write(&self.resources);
        let mut aliases = write(&self.aliases);

        let new_aliases = resource.aliases.clone();
        let entry = resources
            .entry(canonical_id.clone())
            .or_insert_with(|| resource.clone());
        for alias in &new_aliases {
            entry.aliases.insert(alias.clone());
        }
        // A re-registration may also carry executors/location data the
        // first registration lacked (e.g. the first hit came from a
        // shallower listing); keep the richer of the two.
        if entry.executors.is_empty() && !resource.executors.is_empty() {
            entry.executors = resource.executors.clone();
        }
        if entry.location_chain.is_empty() && !resource.location_chain.is_empty() {
            entry.location_chain = resource.location_chain.clone();
        }

        aliases.insert(canonical_id.clone(), canonical_id.clone());
        for alias in &new_aliases {
            aliases.insert(alias.clone(), canonical_id.clone());
        }
    }

    /// Exact, case-sensitive alias lookup.
    pub fn lookup_by_alias(&self, alias: &str) -> Option<ResolvedResource> {
        let canonical_id = read(&self.aliases).get(alias).cloned()?;
        read(&self.resources).get(&canonical_id).cloned()
    }

    /// Exact, case-sensitive canonical id lookup.
    pub fn lookup_by_id(&self, canonical_id: &str) -> Option<ResolvedResource> {
        read(&self.resources).get(canonical_id).cloned()
    }

    /// True iff `canonical_id` was explicitly accessed within `window` of
    /// now.
    pub fn was_recently_accessed(&self, canonical_id: &str, window: StdDuration) -> bool {
        let Some(last) = read(&self.explicit_access).get(canonical_id).copied() else {
            return false;
        };
        let window = Duration::from_std(window).unwrap_or(Duration::MAX);
        Utc::now().signed_duration_since(last) <= window
    }

    /// Whether any resource has been registered in this session yet (used
    /// by the read-only exec bypass under strict resolution).
    pub fn has_any_resources(&self) -> bool {
        !read(&self.resources).is_empty()
    }

    /// Union of allowed actions across a resource's executors, by
    /// canonical id.
    pub fn allowed_actions(&self, canonical_id: &str) -> BTreeSet<String> {
        read(&self.resources)
            .get(canonical_id)
            .map(ResolvedResource::allowed_actions)
            .unwrap_or_default()
    }

    /// Resources whose `host_uid`/enclosing host matches `host_canonical_id`,
    /// i.e. direct children of that host in the location chain.
    pub fn children_of_host(&self, host_canonical_id: &str) -> Vec<ResolvedResource> {
        read(&self.resources)
            .values()
            .filter(|r| {
                r.host_uid
                    .as_deref()
                    .is_some_and(|host| host_matches(r, host, host_canonical_id))
            })
            .cloned()
            .collect()
    }

    /// Children of `host_canonical_id` that were explicitly accessed
    /// within `window` — the evidence a routing-mismatch guard needs
    /// before refusing a direct operation against the parent host.
    pub fn recently_accessed_children(
        &self,
        host_canonical_id: &str,
        window: StdDuration,
    ) -> Vec<ResolvedResource> {
        self.children_of_host(host_canonical_id)
            .into_iter()
            .filter(|r| self.was_recently_accessed(&r.canonical_id(), window))
            .collect()
    }

    /// Clear all session state. Must be called by the host at session
    /// teardown; the context itself never expires entries on its own.
    pub fn clear(&self) {
        write(&self.aliases).clear();
        write(&self.resources).clear();
        write(&self.explicit_access).clear();
    }
}

/// A resource is a "child" of `host_canonical_id` either because its
/// `host_uid` equals the host's provider uid, or because the host's own
/// canonical id appears as a prefix of the resource's location chain.
fn host_matches(resource: &ResolvedResource, host_uid: &str, host_canonical_id: &str) -> bool {
    host_uid == host_canonical_id
        || resource
            .location_chain
            .first()
            .is_some_and(|first| first.ends_with(host_uid))
}

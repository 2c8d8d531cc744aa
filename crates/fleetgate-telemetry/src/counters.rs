//! Low-cardinality counters backed by a concurrent map.
//!
//! Every counter in the gating core is keyed by a small, fixed label
//! set (handler name, action, resource kind, non-interactive category,
//! retry operation) — never by hostnames, resource ids or paths, which
//! would let cardinality grow unbounded with fleet size.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use fleetgate_core::providers::TelemetrySink;

fn key(name: &str, labels: &[(&str, &str)]) -> String {
    if labels.is_empty() {
        return name.to_string();
    }
    let mut sorted: Vec<&(&str, &str)> = labels.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}{{{joined}}}")
}

/// In-process counter registry implementing the core's
/// [`TelemetrySink`] trait.
#[derive(Debug, Default)]
pub struct Counters {
    values: DashMap<String, AtomicU64>,
}

impl Counters {
    /// Create an empty counter registry.
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    /// Current value of a counter, or zero if it has never been
    /// incremented.
    pub fn get(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.values
            .get(&key(name, labels))
            .map(|v| v.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Snapshot of every counter currently tracked, keyed by the
    /// `name{label=value,...}` string.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }
}

impl TelemetrySink for Counters {
    fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        self.values
            .entry(key(name, labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_read_back() {
        let counters = Counters::new();
        counters.increment("strict_resolution_block", &[("handler", "restart"), ("action", "restart")]);
        counters.increment("strict_resolution_block", &[("handler", "restart"), ("action", "restart")]);
        assert_eq!(
            counters.get("strict_resolution_block", &[("handler", "restart"), ("action", "restart")]),
            2
        );
    }

    #[test]
    fn label_order_does_not_create_distinct_keys() {
        let counters = Counters::new();
        counters.increment("routing_mismatch_block", &[("target_kind", "node"), ("child_kind", "lxc")]);
        counters.increment("routing_mismatch_block", &[("child_kind", "lxc"), ("target_kind", "node")]);
        assert_eq!(
            counters.get("routing_mismatch_block", &[("target_kind", "node"), ("child_kind", "lxc")]),
            2
        );
    }

    #[test]
    fn distinct_labels_are_distinct_counters() {
        let counters = Counters::new();
        counters.increment("non_interactive_block", &[("category", "pager")]);
        counters.increment("non_interactive_block", &[("category", "tty_flag")]);
        assert_eq!(counters.get("non_interactive_block", &[("category", "pager")]), 1);
        assert_eq!(counters.get("non_interactive_block", &[("category", "tty_flag")]), 1);
    }
}

//! Security policy — hard boundaries for mutating command invocations.
//!
//! [`GatingPolicy`] defines what commands are blocked outright, what
//! requires human approval, and what is allowed freely. It is the
//! admin-configured layer the [`crate::pipeline`] gate consults.
//!
//! # Policy Check Order
//!
//! 1. Is the command's first token explicitly blocked? -> `Block`
//! 2. Does the command contain a blocked substring? -> `Block`
//! 3. Is the command's first token in the approval-required set? -> `RequireApproval`
//! 4. Does the command's risk meet or exceed the configured floor? -> `RequireApproval`
//! 5. Otherwise -> `Allow`

use std::collections::HashSet;

use fleetgate_core::{PolicyDecision, RiskLevel};
use serde::{Deserialize, Serialize};

/// Security policy defining hard boundaries for mutating commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingPolicy {
    /// First tokens (program names) that are never allowed, e.g. `"sudo"`.
    pub blocked_commands: HashSet<String>,
    /// Substrings that block a command wherever they appear.
    pub blocked_substrings: Vec<String>,
    /// First tokens that always require approval regardless of risk.
    pub approval_required_commands: HashSet<String>,
    /// Minimum risk level at which a command requires approval.
    pub approval_required_risk_floor: RiskLevel,
}

/// Outcome of evaluating a command against a [`GatingPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// The three-valued decision.
    pub decision: PolicyDecision,
    /// Why the policy reached this decision.
    pub reason: String,
}

impl GatingPolicy {
    /// A policy with no blocks and no mandatory approvals beyond the
    /// risk floor — useful as a starting point for host configuration.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            blocked_commands: HashSet::new(),
            blocked_substrings: Vec::new(),
            approval_required_commands: HashSet::new(),
            approval_required_risk_floor: RiskLevel::HighWrite,
        }
    }

    fn first_token(command: &str) -> &str {
        command.trim().split_whitespace().next().unwrap_or("")
    }

    /// Evaluate `command`, already classified at `risk`, against this
    /// policy.
    #[must_use]
    pub fn check(&self, command: &str, risk: RiskLevel) -> PolicyOutcome {
        let first = Self::first_token(command);

        if self.blocked_commands.contains(first) {
            return PolicyOutcome {
                decision: PolicyDecision::Block,
                reason: format!("`{first}` is blocked by policy"),
            };
        }
        for substring in &self.blocked_substrings {
            if command.contains(substring.as_str()) {
                return PolicyOutcome {
                    decision: PolicyDecision::Block,
                    reason: format!("command contains blocked substring `{substring}`"),
                };
            }
        }
        if self.approval_required_commands.contains(first) {
            return PolicyOutcome {
                decision: PolicyDecision::RequireApproval,
                reason: format!("`{first}` always requires approval"),
            };
        }
        if risk >= self.approval_required_risk_floor {
            return PolicyOutcome {
                decision: PolicyDecision::RequireApproval,
                reason: format!("risk level {risk:?} meets the approval floor"),
            };
        }
        PolicyOutcome {
            decision: PolicyDecision::Allow,
            reason: "no policy rule applies".to_string(),
        }
    }
}

impl Default for GatingPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_command_is_blocked_regardless_of_risk() {
        let mut policy = GatingPolicy::permissive();
        policy.blocked_commands.insert("sudo".to_string());
        let outcome = policy.check("sudo reboot", RiskLevel::HighWrite);
        assert_eq!(outcome.decision, PolicyDecision::Block);
    }

    #[test]
    fn blocked_substring_is_blocked() {
        let mut policy = GatingPolicy::permissive();
        policy.blocked_substrings.push("rm -rf /".to_string());
        let outcome = policy.check("rm -rf / --no-preserve-root", RiskLevel::HighWrite);
        assert_eq!(outcome.decision, PolicyDecision::Block);
    }

    #[test]
    fn explicit_approval_command_requires_approval_even_at_low_risk() {
        let mut policy = GatingPolicy::permissive();
        policy.approval_required_commands.insert("mv".to_string());
        let outcome = policy.check("mv a b", RiskLevel::MediumWrite);
        assert_eq!(outcome.decision, PolicyDecision::RequireApproval);
    }

    #[test]
    fn high_write_meets_default_risk_floor() {
        let policy = GatingPolicy::permissive();
        let outcome = policy.check("sudo reboot", RiskLevel::HighWrite);
        assert_eq!(outcome.decision, PolicyDecision::RequireApproval);
    }

    #[test]
    fn low_write_below_floor_is_allowed() {
        let policy = GatingPolicy::permissive();
        let outcome = policy.check("touch foo", RiskLevel::LowWrite);
        assert_eq!(outcome.decision, PolicyDecision::Allow);
    }
}

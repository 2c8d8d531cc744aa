//! Approval & control-level gate.
//!
//! [`evaluate`] runs the five-step order a mutating tool invocation must
//! pass before it reaches the dispatcher: the read-only refusal, the
//! pre-approval bypass, the policy check, the controlled-mode
//! unconditional ticket, and finally dispatch.

use chrono::Utc;
use fleetgate_core::{ApprovalTicket, ControlLevel, PolicyDecision, RiskLevel};

use crate::policy::GatingPolicy;

/// A prepared mutating invocation awaiting the gate's decision.
pub struct Invocation<'a> {
    /// The command text to evaluate.
    pub command: &'a str,
    /// Kind of the target resource, e.g. `docker_container`.
    pub target_type: &'a str,
    /// Canonical id of the target resource.
    pub target_id: &'a str,
    /// Hostname of the agent that would execute the command, when known.
    pub agent_hostname: Option<String>,
    /// The risk bucket the classifier assigned this command.
    pub risk: RiskLevel,
    /// The host's current control level.
    pub control_level: ControlLevel,
    /// Whether the call carries a valid pre-approval marker exchanged
    /// for a previously minted ticket.
    pub pre_approved: bool,
}

/// Result of running a mutating invocation through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Read-only control level refuses all mutating tools outright.
    ReadOnlyRefusal,
    /// The policy blocked the command; `reason` is operator-facing.
    PolicyBlocked {
        /// Why the policy refused the command.
        reason: String,
    },
    /// An approval ticket was minted; the caller must present it and
    /// wait for the operator to exchange it for a pre-approval marker.
    ApprovalRequired {
        /// The minted ticket.
        ticket: ApprovalTicket,
    },
    /// The command is clear to dispatch.
    Dispatch,
}

/// Run `invocation` through the gate.
#[must_use]
pub fn evaluate(policy: &GatingPolicy, invocation: &Invocation<'_>) -> GateOutcome {
    if invocation.control_level.is_read_only() {
        return GateOutcome::ReadOnlyRefusal;
    }

    if invocation.pre_approved {
        return GateOutcome::Dispatch;
    }

    let outcome = policy.check(invocation.command, invocation.risk);
    match outcome.decision {
        PolicyDecision::Block => {
            return GateOutcome::PolicyBlocked {
                reason: outcome.reason,
            };
        }
        PolicyDecision::RequireApproval
            if !matches!(invocation.control_level, ControlLevel::Autonomous) =>
        {
            return GateOutcome::ApprovalRequired {
                ticket: mint_ticket(invocation, outcome.reason),
            };
        }
        PolicyDecision::RequireApproval | PolicyDecision::Allow => {}
    }

    if invocation.control_level.requires_unconditional_approval() {
        return GateOutcome::ApprovalRequired {
            ticket: mint_ticket(
                invocation,
                "controlled mode requires confirmation before dispatch".to_string(),
            ),
        };
    }

    GateOutcome::Dispatch
}

fn mint_ticket(invocation: &Invocation<'_>, description: String) -> ApprovalTicket {
    ApprovalTicket::mint(
        invocation.command,
        invocation.target_type,
        invocation.target_id,
        invocation.agent_hostname.clone(),
        description,
        Utc::now(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation<'a>(command: &'a str, control_level: ControlLevel) -> Invocation<'a> {
        Invocation {
            command,
            target_type: "docker_container",
            target_id: "docker_container:delly:jellyfin",
            agent_hostname: Some("delly".to_string()),
            risk: RiskLevel::HighWrite,
            control_level,
            pre_approved: false,
        }
    }

    #[test]
    fn read_only_level_refuses_outright() {
        let policy = GatingPolicy::permissive();
        let inv = invocation("docker restart jellyfin", ControlLevel::ReadOnly);
        assert_eq!(evaluate(&policy, &inv), GateOutcome::ReadOnlyRefusal);
    }

    #[test]
    fn pre_approved_bypasses_policy_and_control_gate() {
        let mut policy = GatingPolicy::permissive();
        policy.blocked_commands.insert("docker".to_string());
        let mut inv = invocation("docker restart jellyfin", ControlLevel::Controlled);
        inv.pre_approved = true;
        assert_eq!(evaluate(&policy, &inv), GateOutcome::Dispatch);
    }

    #[test]
    fn policy_block_wins_over_control_level() {
        let mut policy = GatingPolicy::permissive();
        policy.blocked_commands.insert("docker".to_string());
        let inv = invocation("docker restart jellyfin", ControlLevel::Autonomous);
        match evaluate(&policy, &inv) {
            GateOutcome::PolicyBlocked { .. } => {}
            other => panic!("expected PolicyBlocked, got {other:?}"),
        }
    }

    #[test]
    fn controlled_mode_mints_ticket_even_when_policy_allows() {
        let policy = GatingPolicy {
            approval_required_risk_floor: RiskLevel::HighWrite,
            ..GatingPolicy::permissive()
        };
        let mut inv = invocation("touch foo", ControlLevel::Controlled);
        inv.risk = RiskLevel::LowWrite;
        match evaluate(&policy, &inv) {
            GateOutcome::ApprovalRequired { .. } => {}
            other => panic!("expected ApprovalRequired, got {other:?}"),
        }
    }

    #[test]
    fn autonomous_mode_bypasses_policy_required_approval() {
        let policy = GatingPolicy::permissive();
        let inv = invocation("docker restart jellyfin", ControlLevel::Autonomous);
        assert_eq!(evaluate(&policy, &inv), GateOutcome::Dispatch);
    }

    #[test]
    fn controlled_mode_requires_approval_for_high_risk() {
        let policy = GatingPolicy::permissive();
        let inv = invocation("docker restart jellyfin", ControlLevel::Controlled);
        match evaluate(&policy, &inv) {
            GateOutcome::ApprovalRequired { ticket } => {
                assert_eq!(ticket.target_id, "docker_container:delly:jellyfin");
            }
            other => panic!("expected ApprovalRequired, got {other:?}"),
        }
    }

    #[test]
    fn deterministic_ticket_id_is_stable_across_calls() {
        let policy = GatingPolicy::permissive();
        let inv = invocation("docker restart jellyfin", ControlLevel::Controlled);
        let first = evaluate(&policy, &inv);
        let second = evaluate(&policy, &inv);
        let (GateOutcome::ApprovalRequired { ticket: t1 }, GateOutcome::ApprovalRequired { ticket: t2 }) =
            (first, second)
        else {
            panic!("expected both calls to require approval");
        };
        assert_eq!(t1.id, t2.id);
    }
}

//! Composes the Classifier (C), Resolution Context (B), Policy Pipeline
//! (D) and Telemetry (G) into the single decision every mutating tool
//! invocation runs through before it may reach the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use fleetgate_classifier::{classify, risk::risk_level};
use fleetgate_core::providers::TelemetrySink;
use fleetgate_core::{ApprovalTicket, ControlLevel, GatingError};
use fleetgate_policy::pipeline::{self, GateOutcome, Invocation};
use fleetgate_policy::policy::GatingPolicy;
use fleetgate_resolution::ResolutionContext;
use fleetgate_telemetry::RateLimiter;

use crate::guards;

/// Shared state every gated tool call reads: the session's resolution
/// context, the policy, the control level, counters, and the
/// process-wide routing-mismatch log limiter.
pub struct GatingContext {
    /// Session-scoped catalog of discovered resources.
    pub resolution: ResolutionContext,
    /// The command-pattern policy.
    pub policy: GatingPolicy,
    /// Current control level.
    pub control_level: ControlLevel,
    /// Whether strict resolution is enabled.
    pub strict_resolution: bool,
    /// "Recently referenced" window for the routing-mismatch guard.
    pub recent_access_window: Duration,
    /// Typed counter sink.
    pub counters: Arc<dyn TelemetrySink>,
    /// Process-wide rate gate for the routing-mismatch debug log.
    pub routing_log_limiter: RateLimiter,
}

impl GatingContext {
    /// Build a context from a [`fleetgate_config::GatingConfig`] and a
    /// telemetry sink, with a fresh per-session resolution context and
    /// a permissive policy the caller can then tighten.
    #[must_use]
    pub fn new(config: &fleetgate_config::GatingConfig, counters: Arc<dyn TelemetrySink>) -> Self {
        Self {
            resolution: ResolutionContext::new(),
            policy: GatingPolicy::default(),
            control_level: config.control_level,
            strict_resolution: config.strict_resolution,
            recent_access_window: config.recent_access_window,
            counters,
            routing_log_limiter: RateLimiter::new(config.rate_limit_log_interval),
        }
    }
}

/// The decision a mutating command reaches after running the gate.
pub enum Gate {
    /// The command was refused; the caller should return the error
    /// envelope without touching the agent.
    Blocked(GatingError),
    /// An approval ticket was minted and must be exchanged before
    /// dispatch.
    ApprovalRequired(ApprovalTicket),
    /// The command is clear to dispatch, carrying an optional
    /// operator-facing warning (the read-only exec bypass).
    Dispatch {
        /// Non-blocking warning to surface alongside a successful
        /// result.
        warning: Option<String>,
    },
}

/// Run a mutating command through strict resolution, the routing
/// guard, and the policy pipeline, in that order.
pub fn gate_write(
    ctx: &GatingContext,
    handler: &str,
    command: &str,
    target_type: &str,
    target_id: &str,
    action: &str,
    agent_hostname: Option<String>,
    pre_approved: bool,
) -> Gate {
    if let Some(err) = guards::check_strict_resolution(&ctx.resolution, ctx.strict_resolution, target_id, action) {
        ctx.counters.increment("strict_resolution_block", &[("handler", handler), ("action", action)]);
        return Gate::Blocked(err);
    }

    if let Some(err) = guards::check_routing_mismatch(&ctx.resolution, target_id, target_type, ctx.recent_access_window) {
        if let GatingError::RoutingMismatch { child_kinds, .. } = &err {
            let child_kind = child_kinds.first().map_or("unknown", String::as_str);
            ctx.counters
                .increment("routing_mismatch_block", &[("target_kind", target_type), ("child_kind", child_kind)]);
            if ctx.routing_log_limiter.try_acquire() {
                tracing::debug!(target_kind = target_type, child_kind, "routing mismatch block");
            }
        }
        return Gate::Blocked(err);
    }

    let intent = classify(command);
    let risk = risk_level(command, intent.intent);

    let invocation = Invocation {
        command,
        target_type,
        target_id,
        agent_hostname,
        risk,
        control_level: ctx.control_level,
        pre_approved,
    };

    match pipeline::evaluate(&ctx.policy, &invocation) {
        GateOutcome::ReadOnlyRefusal => Gate::Blocked(GatingError::PolicyBlocked {
            reason: "mutating tools are refused in read-only mode".to_string(),
        }),
        GateOutcome::PolicyBlocked { reason } => {
            ctx.counters.increment("policy_block", &[]);
            Gate::Blocked(GatingError::PolicyBlocked { reason })
        }
        GateOutcome::ApprovalRequired { ticket } => {
            ctx.counters.increment("approval_minted", &[]);
            Gate::ApprovalRequired(ticket)
        }
        GateOutcome::Dispatch => Gate::Dispatch { warning: None },
    }
}

/// Run a read-only command through strict resolution only, applying the
/// read-only exec bypass when the target itself was never discovered
/// but the session has discovered other resources.
pub fn gate_read(ctx: &GatingContext, command: &str, target_id: &str) -> Result<Option<String>, GatingError> {
    let intent = classify(command);

    if let Some(warning) = guards::read_only_exec_bypass_warning(&ctx.resolution, ctx.strict_resolution, target_id) {
        if intent.intent.is_read_only() {
            return Ok(Some(warning));
        }
    }

    if let Some(err) = guards::check_strict_resolution(&ctx.resolution, ctx.strict_resolution, target_id, "read") {
        return Err(err);
    }

    Ok(None)
}

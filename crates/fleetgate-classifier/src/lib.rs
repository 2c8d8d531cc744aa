//! Execution intent classification.
//!
//! `classify` decides whether a shell command string is provably
//! read-only and bounded, without ever running it. It is a conservative,
//! textual judgment: six ordered phases each get a chance to decide, and
//! the first phase with an opinion wins. A command that no phase
//! recognizes as read-only falls back to a write verdict.

mod lexer;
mod phase1_5_noninteractive;
mod phase1_mutation;
mod phase2_write_patterns;
mod phase3_read_only;
mod phase4_guardrails;
mod phase5_inspect;
mod phase6_fallback;
mod risk;

pub use fleetgate_core::{IntentResult, Intention, NonInteractiveBlock, NonInteractiveCategory, RiskLevel};
pub use phase5_inspect::{baseline_inspectors, ContentInspector, SqlInspector};
pub use risk::risk_level;

/// Classify `cmd` against the baseline inspector set.
pub fn classify(cmd: &str) -> IntentResult {
    classify_with_inspectors(cmd, &baseline_inspectors())
}

/// Classify `cmd`, using a caller-supplied inspector set for phase 5.
/// Exposed so a host that registers additional `ContentInspector`s for
/// other interactive tools can still drive the full pipeline.
pub fn classify_with_inspectors(
    cmd: &str,
    inspectors: &[Box<dyn ContentInspector>],
) -> IntentResult {
    let trimmed = cmd.trim();
    if trimmed.is_empty() {
        return IntentResult::write_or_unknown("empty command");
    }

    if let Some(reason) = phase1_mutation::check(trimmed) {
        return IntentResult::write_or_unknown(reason);
    }

    if let Some(block) = phase1_5_noninteractive::check(trimmed) {
        return IntentResult::blocked_non_interactive(block);
    }

    if let Some(reason) = phase2_write_patterns::check(trimmed) {
        return IntentResult::write_or_unknown(reason);
    }

    if let Some(reason) = phase3_read_only::check(trimmed) {
        return IntentResult::read_only_certain(reason);
    }

    if let Some(reason) = phase4_guardrails::check(trimmed) {
        return IntentResult::write_or_unknown(reason);
    }

    if let Some((is_read_only, reason)) = phase5_inspect::check(trimmed, inspectors) {
        return if is_read_only {
            IntentResult::read_only_conditional(reason)
        } else {
            IntentResult::write_or_unknown(reason)
        };
    }

    IntentResult::write_or_unknown(phase6_fallback::check(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_command_is_certain() {
        let result = classify("cat /etc/hostname");
        assert_eq!(result.intent, Intention::ReadOnlyCertain);
    }

    #[test]
    fn sed_in_place_beats_sed_read_pattern() {
        let result = classify("sed -i 's/a/b/' file.txt");
        assert_eq!(result.intent, Intention::WriteOrUnknown);
    }

    #[test]
    fn quoted_select_is_conditional_read_only() {
        let result = classify(r#"sqlite3 db "SELECT 1;""#);
        assert_eq!(result.intent, Intention::ReadOnlyConditional);
    }

    #[test]
    fn timeout_wrapped_tail_follow_is_certain_read_only() {
        let result = classify("timeout 5 tail -f /var/log/x");
        assert_eq!(result.intent, Intention::ReadOnlyCertain);
    }

    #[test]
    fn bare_tail_follow_is_blocked_non_interactive() {
        let result = classify("tail -f /var/log/x");
        assert_eq!(result.intent, Intention::WriteOrUnknown);
        let block = result.non_interactive_block.unwrap();
        assert_eq!(block.category, NonInteractiveCategory::UnboundedStream);
        assert_eq!(block.rewrite_suggestion.as_deref(), Some("tail -n 200 /var/log/x"));
    }

    #[test]
    fn docker_exec_it_is_blocked_tty() {
        let result = classify("docker exec -it app bash");
        assert_eq!(result.intent, Intention::WriteOrUnknown);
        assert_eq!(
            result.non_interactive_block.unwrap().category,
            NonInteractiveCategory::TtyFlag
        );
    }

    #[test]
    fn sudo_is_write() {
        let result = classify("sudo cat /etc/shadow");
        assert_eq!(result.intent, Intention::WriteOrUnknown);
    }

    #[test]
    fn unrecognized_command_falls_back_to_write() {
        let result = classify("frobnicate --loudly");
        assert_eq!(result.intent, Intention::WriteOrUnknown);
    }

    #[test]
    fn empty_command_is_write() {
        assert_eq!(classify("").intent, Intention::WriteOrUnknown);
        assert_eq!(classify("   ").intent, Intention::WriteOrUnknown);
    }
}

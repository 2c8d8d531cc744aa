//! Back-compat risk bucketing.
//!
//! Older callers want a four-level `RiskLevel` rather than the
//! three-valued intent. This derives one from the same signals the
//! phases already computed, so it never disagrees with `classify`.

use fleetgate_core::{Intention, RiskLevel};

use crate::lexer::{contains_unquoted, mask_quotes};
use crate::phase2_write_patterns::{tier, Tier};

/// Bucket `cmd` into a `RiskLevel`, given the intent `classify` already
/// reached for it.
pub fn risk_level(cmd: &str, intent: Intention) -> RiskLevel {
    if matches!(intent, Intention::ReadOnlyCertain | Intention::ReadOnlyConditional) {
        return RiskLevel::ReadOnly;
    }

    let masked = mask_quotes(cmd);
    let has_redirect = contains_unquoted(cmd, ">") || contains_unquoted(cmd, "<");
    let has_sudo = masked.to_lowercase().contains("sudo");

    if has_redirect || has_sudo {
        return RiskLevel::HighWrite;
    }

    match tier(cmd).map(|(t, _)| t) {
        Some(Tier::High) => RiskLevel::HighWrite,
        Some(Tier::Medium) => RiskLevel::MediumWrite,
        None => RiskLevel::LowWrite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_intent_is_read_only_risk() {
        assert_eq!(risk_level("cat /etc/hostname", Intention::ReadOnlyCertain), RiskLevel::ReadOnly);
    }

    #[test]
    fn sudo_is_high_write() {
        assert_eq!(risk_level("sudo reboot", Intention::WriteOrUnknown), RiskLevel::HighWrite);
    }

    #[test]
    fn redirect_is_high_write() {
        assert_eq!(risk_level("echo hi > out.txt", Intention::WriteOrUnknown), RiskLevel::HighWrite);
    }

    #[test]
    fn package_manager_is_high_write() {
        assert_eq!(risk_level("apt-get install curl", Intention::WriteOrUnknown), RiskLevel::HighWrite);
    }

    #[test]
    fn mv_is_medium_write() {
        assert_eq!(risk_level("mv a b", Intention::WriteOrUnknown), RiskLevel::MediumWrite);
    }

    #[test]
    fn unrecognized_write_is_low_write() {
        assert_eq!(risk_level("frobnicate --loudly", Intention::WriteOrUnknown), RiskLevel::LowWrite);
    }
}

//! Phase 6 — conservative fallback.
//!
//! Anything that reaches here matched no read-only rule and no known
//! write pattern. Treat the unknown as a write.

/// Always resolves to a write-or-unknown verdict.
pub fn check(_cmd: &str) -> String {
    "no read-only rule matched; treated conservatively as a write".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_falls_back_to_write() {
        assert!(!check("frobnicate --loudly").is_empty());
    }
}

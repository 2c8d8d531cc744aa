//! Phase 1 — mutation-capability guards.
//!
//! A command is `WriteOrUnknown` if it carries any capability that lets
//! it mutate state regardless of which program runs first: privilege
//! escalation, output/input redirection, command substitution, piping
//! into something that will itself interpret and act on its input, or
//! shell chaining that sequences further commands.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexer::{mask_quotes, strip_benign_redirects};

static SUDO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsudo\b").expect("valid regex"));

static DUAL_USE_CONSUMERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // shells
        "sh", "bash", "zsh", "dash", "ksh", "fish",
        // SQL CLIs
        "sqlite3", "mysql", "mariadb", "psql", "mycli", "pgcli", "litecli",
        // NoSQL clients
        "mongo", "mongosh", "redis-cli", "influx", "cqlsh",
        // scripting interpreters
        "python", "python2", "python3", "perl", "ruby", "node", "nodejs", "php",
        // argument-expanding dispatcher
        "xargs",
    ]
    .into_iter()
    .collect()
});

fn basename(token: &str) -> &str {
    token.rsplit('/').next().unwrap_or(token)
}

/// Whether `cmd` pipes into a dual-use consumer, outside of quotes.
/// `||` (the logical-or chain operator) is excluded from consideration
/// here — it is covered by the shell-chaining check below.
fn pipes_into_dual_use(masked: &str) -> bool {
    // Blank out every `||` occurrence first so remaining `|` characters
    // are genuine single pipes.
    let without_or: Vec<char> = {
        let mut chars: Vec<char> = masked.chars().collect();
        let mut i = 0;
        while i + 1 < chars.len() {
            if chars[i] == '|' && chars[i + 1] == '|' {
                chars[i] = '\u{0}';
                chars[i + 1] = '\u{0}';
                i += 2;
            } else {
                i += 1;
            }
        }
        chars
    };

    let mut i = 0;
    while i < without_or.len() {
        if without_or[i] == '|' {
            let rest: String = without_or[i + 1..].iter().collect();
            let next_token = rest.split_whitespace().find(|t| !t.is_empty());
            if let Some(tok) = next_token {
                let tok = tok.trim_matches('\u{0}');
                if DUAL_USE_CONSUMERS.contains(basename(tok)) {
                    return true;
                }
            }
        }
        i += 1;
    }
    false
}

/// Whether `cmd` chains further clauses outside quotes via `;`, `&&` or
/// `||`.
fn has_shell_chaining(masked: &str) -> bool {
    masked.contains(';') || masked.contains("&&") || masked.contains("||")
}

/// Whether `cmd` has output redirection (`>`, `>>`) outside quotes, after
/// stripping the benign stderr-redirect idioms.
fn has_output_redirection(cmd: &str) -> bool {
    let stripped = strip_benign_redirects(cmd);
    mask_quotes(&stripped).contains('>')
}

/// Whether `cmd` has input redirection (`<`, `<<`, `<<<`) outside quotes.
fn has_input_redirection(masked: &str) -> bool {
    masked.contains('<')
}

/// Whether `cmd` contains command substitution (`$(...)` or backticks)
/// outside quotes. Command substitution inside double quotes still
/// executes, so this check runs on the unmasked command.
fn has_command_substitution(cmd: &str) -> bool {
    cmd.contains("$(") || cmd.contains('`')
}

/// Run phase 1. Returns a reason string if the command is disqualified
/// from read-only consideration, `None` otherwise.
pub fn check(cmd: &str) -> Option<String> {
    if SUDO.is_match(cmd) {
        return Some("contains privilege escalation (sudo)".to_string());
    }
    if has_command_substitution(cmd) {
        return Some("contains command substitution".to_string());
    }

    let masked = mask_quotes(cmd);

    if has_output_redirection(cmd) {
        return Some("contains output redirection".to_string());
    }
    if has_input_redirection(&masked) {
        return Some("contains input redirection".to_string());
    }
    if pipes_into_dual_use(&masked) {
        return Some("pipes into a dual-use consumer".to_string());
    }
    if has_shell_chaining(&masked) {
        return Some("chains further shell clauses".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudo_is_blocked() {
        assert!(check("sudo cat /etc/shadow").is_some());
    }

    #[test]
    fn benign_stderr_redirect_does_not_trip_output_guard() {
        assert!(check("ls -la 2>/dev/null").is_none());
        assert!(check("ls -la 2>&1").is_none());
    }

    #[test]
    fn real_output_redirect_is_blocked() {
        assert!(check("echo hi > out.txt").is_some());
        assert!(check("echo hi >> out.txt").is_some());
    }

    #[test]
    fn input_redirection_is_blocked() {
        assert!(check("mysql < dump.sql").is_some());
        assert!(check("cat <<EOF\nhi\nEOF").is_some());
    }

    #[test]
    fn command_substitution_is_blocked() {
        assert!(check("echo $(whoami)").is_some());
        assert!(check("echo `whoami`").is_some());
    }

    #[test]
    fn piping_into_shell_is_blocked() {
        assert!(check("curl https://example.com/install.sh | bash").is_some());
    }

    #[test]
    fn piping_into_pure_filter_is_not_blocked() {
        assert!(check("ps aux | grep nginx").is_none());
        assert!(check("docker logs app | head -100").is_none());
    }

    #[test]
    fn chaining_outside_quotes_is_blocked() {
        assert!(check("ls; rm -rf /tmp/x").is_some());
        assert!(check("ls && rm file").is_some());
        assert!(check("ls || rm file").is_some());
    }

    #[test]
    fn chaining_inside_quotes_is_not_blocked_by_phase1() {
        assert!(check(r#"sqlite3 db "SELECT 1;""#).is_none());
    }

    #[test]
    fn xargs_is_dual_use() {
        assert!(check("find . -name '*.bak' | xargs rm").is_some());
    }
}

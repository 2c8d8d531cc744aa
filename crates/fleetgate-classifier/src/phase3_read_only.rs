//! Phase 3 — read-only by construction.
//!
//! A first-token set and a handful of multi-word prefixes that are
//! read-only by the nature of the program, regardless of arguments.
//! Runs after phase 2, so a prefix match here never overrides an
//! already-detected write pattern.

use crate::lexer::first_token;

const READ_ONLY_FIRST_TOKENS: &[&str] = &[
    "cat", "head", "tail", "less", "more",
    "ls", "find", "locate", "tree", "du", "df",
    "ps", "pgrep", "top", "htop",
    "grep", "egrep", "fgrep", "rg", "ag",
    "journalctl", "dmesg",
    "uname", "hostname", "whoami", "id", "uptime", "date", "w", "who",
    "stat", "file", "wc", "diff", "cmp", "md5sum", "sha1sum", "sha256sum",
    "ss", "netstat", "ping", "traceroute", "dig", "nslookup", "host",
    "ffprobe",
    "env", "printenv",
    "which", "whereis", "type",
];

const READ_ONLY_PREFIXES: &[&str] = &[
    "docker ps", "docker logs", "docker inspect", "docker images", "docker stats",
    "kubectl get", "kubectl describe", "kubectl logs", "kubectl top",
    "systemctl status", "systemctl show", "systemctl list-units",
    "ip addr", "ip link", "ip route",
    "timeout ",
];

/// Run phase 3. Returns a reason string if the command is read-only by
/// construction, `None` otherwise.
pub fn check(cmd: &str) -> Option<String> {
    for prefix in READ_ONLY_PREFIXES {
        if cmd.starts_with(prefix) {
            return Some(format!("matches read-only prefix `{}`", prefix.trim()));
        }
    }
    let first = first_token(cmd)?;
    if READ_ONLY_FIRST_TOKENS.contains(&first.as_str()) {
        return Some(format!("`{first}` is read-only by construction"));
    }
    None
}

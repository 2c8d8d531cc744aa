//! Phase 2 — write patterns.
//!
//! Substring match against two curated dictionaries, run before phase 3
//! so a command like `sed -i` is classified as a write before `sed`
//! alone would match a read-only first-token pattern.

use crate::lexer::first_token;

const HIGH_RISK_SUBSTRINGS: &[&str] = &[
    "rm ", "rm\t", "rmdir",
    "shutdown", "reboot", "poweroff", "halt",
    "systemctl start", "systemctl stop", "systemctl restart", "systemctl enable", "systemctl disable",
    "service ", "init ",
    "apt ", "apt-get", "yum ", "dnf ", "pacman", "apk ", "brew ",
    "pip install", "pip uninstall", "npm install", "npm uninstall", "cargo install",
    "docker rm", "docker stop", "docker kill", "docker restart", "docker exec",
    "kill ", "killall", "pkill",
    "dd ", "mkfs", "fdisk", "parted", "mkswap",
    "iptables", "nft ", "ufw ", "firewall-cmd",
    "truncate",
    "chmod", "chown", "chgrp",
    "useradd", "userdel", "usermod", "passwd", "chpasswd",
    "crontab -e", "crontab -r", "crontab -",
    "visudo", "vipw",
    "mount ", "umount",
    "modprobe", "rmmod", "insmod",
    "sysctl -w",
];

const MEDIUM_RISK_SUBSTRINGS: &[&str] = &[
    "mv ", "cp ",
    "sed -i", "awk -i",
    "touch ", "mkdir",
    "echo ", "printf ",
    "wget -O", "wget --output",
    "tar ", "unzip", "gunzip", "7z ",
    "ln ",
];

/// Whether `cmd` is a `curl` invocation carrying a mutating HTTP method
/// or a body upload.
fn is_http_mutating_curl(cmd: &str) -> bool {
    if first_token(cmd).as_deref() != Some("curl") {
        return false;
    }
    if cmd.contains("-d ") || cmd.contains("--data") || cmd.contains("--upload") {
        return true;
    }
    ["-X POST", "-X PUT", "-X DELETE", "-X PATCH"]
        .iter()
        .any(|m| cmd.contains(m))
}

/// Which dictionary tier a write pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
}

/// Which tier, if any, `cmd` matches, with a reason.
pub(crate) fn tier(cmd: &str) -> Option<(Tier, String)> {
    if is_http_mutating_curl(cmd) {
        return Some((Tier::High, "curl invocation mutates a remote resource".to_string()));
    }
    for pattern in HIGH_RISK_SUBSTRINGS {
        if cmd.contains(pattern) {
            return Some((Tier::High, format!("matches high-risk write pattern `{}`", pattern.trim())));
        }
    }
    for pattern in MEDIUM_RISK_SUBSTRINGS {
        if cmd.contains(pattern) {
            return Some((Tier::Medium, format!("matches medium-risk write pattern `{}`", pattern.trim())));
        }
    }
    None
}

/// Run phase 2. Returns a reason string if the command matches a known
/// write pattern, `None` otherwise.
pub fn check(cmd: &str) -> Option<String> {
    tier(cmd).map(|(_, reason)| reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sed_in_place_is_a_write() {
        assert!(check("sed -i 's/a/b/' file.txt").is_some());
    }

    #[test]
    fn package_manager_install_is_high_risk() {
        assert!(check("apt-get install curl").is_some());
        assert!(check("pip install requests").is_some());
    }

    #[test]
    fn docker_exec_is_high_risk() {
        assert!(check("docker exec app ls").is_some());
    }

    #[test]
    fn mv_and_cp_are_medium_risk() {
        assert!(check("mv a b").is_some());
        assert!(check("cp a b").is_some());
    }

    #[test]
    fn curl_get_is_not_flagged() {
        assert!(check("curl https://example.com/status").is_none());
    }

    #[test]
    fn curl_post_is_flagged() {
        assert!(check("curl -X POST https://example.com/api").is_some());
        assert!(check("curl --data '{}' https://example.com/api").is_some());
    }

    #[test]
    fn read_only_looking_command_is_not_flagged() {
        assert!(check("cat /etc/hostname").is_none());
    }
}

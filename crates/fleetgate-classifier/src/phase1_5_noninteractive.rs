//! Phase 1.5 — non-interactive guards.
//!
//! Even a read-only-by-construction command is refused if it would hang
//! waiting on a terminal or stream forever: a TTY flag, a pager/editor, a
//! live monitor, a `-f`-style follow with no exit bound, or a bare
//! interactive REPL invocation with no inline script.

use std::sync::LazyLock;

use fleetgate_core::{NonInteractiveBlock, NonInteractiveCategory};
use regex::Regex;

use crate::lexer::tokenize;

static TTY_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(-it|-ti|-i\s+-t|--tty|--interactive|-t|-i)(?:\s|$)").expect("valid regex")
});

const PAGERS: &[&str] = &["less", "more", "vim", "vi", "nano", "emacs", "pico", "ed"];

const UNBOUNDED_MONITORS: &[&str] = &["top", "htop", "atop", "iotop", "iftop", "nload", "watch"];

const STREAMING_COMMANDS: &[&str] = &["tail", "journalctl", "dmesg"];

const FOLLOW_FLAGS: &[&str] = &["-f", "--follow", "-w"];

const EXIT_BOUND_FLAGS: &[&str] = &["-n", "--lines", "--tail", "--since", "--until"];

const REPLS: &[&str] = &[
    "ssh", "mysql", "psql", "sqlite3", "redis-cli", "python", "python2", "python3", "node",
    "nodejs", "irb", "pry",
];

const INLINE_SCRIPT_FLAGS: &[&str] = &["-c", "-e", "--execute"];

/// REPLs that take a database/file positional as their first argument, so a
/// *second* positional past that one is a script body, not another target.
const SQL_REPLS: &[&str] = &["mysql", "psql", "sqlite3"];

fn has_tty_flag(tokens: &[String]) -> bool {
    let joined = format!(" {} ", tokens.join(" "));
    TTY_FLAG.is_match(&joined)
}

fn is_docker_or_kubectl_exec(tokens: &[String]) -> bool {
    if tokens.len() < 2 {
        return false;
    }
    let first = tokens[0].as_str();
    let second = tokens[1].as_str();
    (first == "docker" || first == "kubectl")
        && (second == "exec" || second == "run")
}

fn check_tty_flag(tokens: &[String]) -> Option<NonInteractiveBlock> {
    if !is_docker_or_kubectl_exec(tokens) {
        return None;
    }
    if !has_tty_flag(tokens) {
        return None;
    }
    let rewritten: Vec<&String> = tokens
        .iter()
        .filter(|t| !matches!(t.as_str(), "-it" | "-ti" | "--tty" | "--interactive" | "-t" | "-i"))
        .collect();
    let rewritten: Vec<String> = rewritten.into_iter().cloned().collect();
    Some(NonInteractiveBlock {
        category: NonInteractiveCategory::TtyFlag,
        message: "command requests an interactive TTY, which the gating core cannot attach"
            .to_string(),
        rewrite_suggestion: Some(rewritten.join(" ")),
        safe_for_auto_apply: true,
    })
}

fn check_pager(tokens: &[String]) -> Option<NonInteractiveBlock> {
    let first = tokens.first()?;
    if PAGERS.contains(&first.as_str()) {
        return Some(NonInteractiveBlock {
            category: NonInteractiveCategory::Pager,
            message: format!("{first} is an interactive pager/editor and will hang waiting on a terminal"),
            rewrite_suggestion: None,
            safe_for_auto_apply: false,
        });
    }
    None
}

fn has_exit_bound(tokens: &[String]) -> bool {
    if tokens.first().map(String::as_str) == Some("timeout") {
        return true;
    }
    tokens.iter().any(|t| {
        EXIT_BOUND_FLAGS.iter().any(|f| t == f || t.starts_with(&format!("{f}=")))
            || tail_numeric_shorthand(t)
    })
}

/// `tail`'s `-NUMBER` shorthand, e.g. `-200`.
fn tail_numeric_shorthand(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn check_unbounded_stream(tokens: &[String]) -> Option<NonInteractiveBlock> {
    let first = tokens.first()?.as_str();

    if UNBOUNDED_MONITORS.contains(&first) {
        let rewrite = match first {
            "top" | "htop" | "atop" => Some("ps aux --sort=-%cpu | head -20".to_string()),
            "watch" => tokens.get(1).map(|_| tokens[1..].join(" ")),
            _ => None,
        };
        return Some(NonInteractiveBlock {
            category: NonInteractiveCategory::UnboundedStream,
            message: format!("{first} runs indefinitely and never exits on its own"),
            rewrite_suggestion: rewrite.clone(),
            safe_for_auto_apply: rewrite.is_some(),
        });
    }

    let is_docker_logs = tokens.len() >= 2 && tokens[0] == "docker" && tokens[1] == "logs";
    let is_kubectl_logs = tokens.len() >= 2 && tokens[0] == "kubectl" && tokens[1] == "logs";
    let is_streaming_cmd = STREAMING_COMMANDS.contains(&first) || is_docker_logs || is_kubectl_logs;
    if !is_streaming_cmd {
        return None;
    }

    let has_follow = tokens.iter().any(|t| FOLLOW_FLAGS.contains(&t.as_str()));
    if !has_follow {
        return None;
    }
    if has_exit_bound(tokens) {
        return None;
    }

    let rewrite = if first == "tail" {
        let mut rest: Vec<String> = tokens[1..]
            .iter()
            .filter(|t| !FOLLOW_FLAGS.contains(&t.as_str()))
            .cloned()
            .collect();
        rest.insert(0, "-n".to_string());
        rest.insert(1, "200".to_string());
        Some(format!("tail {}", rest.join(" ")))
    } else {
        None
    };

    Some(NonInteractiveBlock {
        category: NonInteractiveCategory::UnboundedStream,
        message: format!("{first} is following output with no exit bound"),
        rewrite_suggestion: rewrite.clone(),
        safe_for_auto_apply: rewrite.is_some(),
    })
}

fn check_interactive_repl(tokens: &[String]) -> Option<NonInteractiveBlock> {
    let first = tokens.first()?.as_str();
    let is_openssl_repl = first == "openssl"
        && tokens
            .get(1)
            .is_some_and(|sub| sub == "s_client" || sub == "s_server");
    if !REPLS.contains(&first) && !is_openssl_repl {
        return None;
    }

    let has_inline_script = tokens
        .iter()
        .any(|t| INLINE_SCRIPT_FLAGS.contains(&t.as_str()));
    // ssh carries an explicit remote command as a trailing positional
    // argument once past its own flags; mysql/psql/sqlite3 take a
    // database/file positional too, and a *second* positional past that
    // one is an inline script body (e.g. `sqlite3 db "SELECT 1;"`). A
    // bare invocation (no flags, one positional at most) is still the
    // interactive case.
    let has_positional_beyond_target = tokens.len() > 2;
    let allows_positional_script = first == "ssh" || SQL_REPLS.contains(&first);

    if has_inline_script || (allows_positional_script && has_positional_beyond_target) {
        return None;
    }

    Some(NonInteractiveBlock {
        category: NonInteractiveCategory::InteractiveRepl,
        message: format!("{first} with no inline command/script opens an interactive session"),
        rewrite_suggestion: None,
        safe_for_auto_apply: false,
    })
}

/// Run phase 1.5. Returns the block if any non-interactive rule fires.
pub fn check(cmd: &str) -> Option<NonInteractiveBlock> {
    let tokens = tokenize(cmd);
    if tokens.is_empty() {
        return None;
    }
    check_tty_flag(&tokens)
        .or_else(|| check_pager(&tokens))
        .or_else(|| check_unbounded_stream(&tokens))
        .or_else(|| check_interactive_repl(&tokens))
}

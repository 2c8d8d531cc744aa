//! Phase 5 — content inspection.
//!
//! Some tools are only read-only if the payload they were handed is. A
//! `ContentInspector` declares which commands it applies to and, for
//! those, whether the embedded content is read-only. Inspectors run in
//! registration order; the first one that `applies` decides the phase.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexer::{first_token, quoted_spans, tokenize};

/// A pluggable content inspector for phase 5.
pub trait ContentInspector: Send + Sync {
    /// Whether this inspector has an opinion about `cmd`.
    fn applies(&self, cmd: &str) -> bool;

    /// Whether the content `cmd` carries is read-only, with an
    /// explanatory reason either way.
    fn is_read_only(&self, cmd: &str) -> (bool, String);
}

static SQL_CLIS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["sqlite3", "mysql", "mariadb", "psql", "mycli", "pgcli", "litecli"]
        .into_iter()
        .collect()
});

static WRITE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(insert|update|delete|replace|create|drop|alter|truncate|merge|upsert|begin|commit|rollback|savepoint|release|attach|detach|vacuum|reindex|grant|revoke|pragma)\b",
    )
    .expect("valid regex")
});

const INLINE_SQL_FLAGS: &[&str] = &["-e", "-c", "--execute"];

/// Text of the SQL payload the command carries inline, if any. A
/// quoted argument, a value following `-e`/`-c`/`--execute`, or a bare
/// dot-command token all count as inline.
fn inline_sql_text(cmd: &str, tokens: &[String]) -> Option<String> {
    let spans = quoted_spans(cmd);
    if !spans.is_empty() {
        return Some(spans.join(" "));
    }
    for (i, tok) in tokens.iter().enumerate() {
        if INLINE_SQL_FLAGS.contains(&tok.as_str()) {
            if let Some(value) = tokens.get(i + 1) {
                return Some(value.clone());
            }
        }
    }
    tokens
        .iter()
        .find(|t| t.starts_with('.'))
        .cloned()
}

/// Baseline inspector for interactive SQL CLIs.
pub struct SqlInspector;

impl ContentInspector for SqlInspector {
    fn applies(&self, cmd: &str) -> bool {
        first_token(cmd).is_some_and(|t| SQL_CLIS.contains(t.as_str()))
    }

    fn is_read_only(&self, cmd: &str) -> (bool, String) {
        let tokens = tokenize(cmd);
        let Some(sql) = inline_sql_text(cmd, &tokens) else {
            return (
                false,
                "SQL CLI invocation has no inline statement to inspect".to_string(),
            );
        };
        if WRITE_KEYWORD.is_match(&sql) {
            return (false, "inline SQL contains a write or control keyword".to_string());
        }
        (true, "inline SQL carries no write or control keyword".to_string())
    }
}

/// The baseline inspector set the classifier ships with.
pub fn baseline_inspectors() -> Vec<Box<dyn ContentInspector>> {
    vec![Box::new(SqlInspector)]
}

/// Run phase 5 against the given inspector set. Returns `Some((is_read_only, reason))`
/// for the first applicable inspector, `None` if none applies.
pub fn check(cmd: &str, inspectors: &[Box<dyn ContentInspector>]) -> Option<(bool, String)> {
    inspectors
        .iter()
        .find(|i| i.applies(cmd))
        .map(|i| i.is_read_only(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspectors() -> Vec<Box<dyn ContentInspector>> {
        baseline_inspectors()
    }

    #[test]
    fn select_is_read_only() {
        let (ok, _) = check(r#"sqlite3 db "SELECT 1;""#, &inspectors()).unwrap();
        assert!(ok);
    }

    #[test]
    fn insert_is_not_read_only() {
        let (ok, _) = check(r#"psql mydb -c "INSERT INTO t VALUES (1)""#, &inspectors()).unwrap();
        assert!(!ok);
    }

    #[test]
    fn pragma_is_not_read_only() {
        let (ok, _) = check(r#"sqlite3 db "PRAGMA journal_mode=WAL;""#, &inspectors()).unwrap();
        assert!(!ok);
    }

    #[test]
    fn non_sql_command_does_not_apply() {
        assert!(check("cat file.sql", &inspectors()).is_none());
    }

    #[test]
    fn sql_cli_with_no_inline_statement_is_not_read_only() {
        let (ok, _) = check("psql mydb", &inspectors()).unwrap();
        assert!(!ok);
    }

    #[test]
    fn dot_command_is_read_only() {
        let (ok, _) = check("sqlite3 db .tables", &inspectors()).unwrap();
        assert!(ok);
    }
}

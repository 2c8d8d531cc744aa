//! Shallow lexical helpers shared by every classifier phase.
//!
//! The classifier never builds a full shell AST — commands reach it as
//! opaque strings the model wrote, and a full POSIX-shell grammar is both
//! more than the guard rules need and easy to get adversarially wrong.
//! Instead this module offers two primitives every phase builds on:
//! masking quoted spans so operator search ignores `;`/`|`/`>` that live
//! inside a quoted argument, and a simple whitespace tokenizer that
//! honors the same quoting.

/// Replace the interior of every single- and double-quoted span with
/// `'\u{0}'` placeholders, preserving string length and the position of
/// every other character. Escaped quotes (`\"`) inside double quotes do
/// not end the span. This lets later phases search for shell
/// metacharacters with plain substring/regex matching while ignoring any
/// that live inside quotes.
pub fn mask_quotes(cmd: &str) -> String {
    let mut out = String::with_capacity(cmd.len());
    let mut chars = cmd.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                out.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                out.push(c);
            }
            '\\' if in_double => {
                out.push('\u{0}');
                if chars.peek().is_some() {
                    out.push('\u{0}');
                    chars.next();
                }
            }
            _ if in_single || in_double => out.push('\u{0}'),
            _ => out.push(c),
        }
    }
    out
}

/// Whether any unmasked (i.e. outside-quotes) occurrence of `needle`
/// exists in `cmd`.
pub fn contains_unquoted(cmd: &str, needle: &str) -> bool {
    mask_quotes(cmd).contains(needle)
}

/// Text that appears inside single or double quotes, concatenated in
/// order of appearance. Used by phase 5 to inspect inline SQL/script
/// bodies without tripping on shell metacharacters that live inside them.
pub fn quoted_spans(cmd: &str) -> Vec<String> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                if in_single {
                    spans.push(std::mem::take(&mut current));
                }
                in_single = !in_single;
            }
            '"' if !in_single => {
                if in_double {
                    spans.push(std::mem::take(&mut current));
                }
                in_double = !in_double;
            }
            '\\' if in_double => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            _ if in_single || in_double => current.push(c),
            _ => {}
        }
    }
    spans
}

/// Split on ASCII whitespace, respecting quotes (a quoted span containing
/// spaces stays one token). Quote characters are stripped from the
/// emitted tokens.
pub fn tokenize(cmd: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut has_content = false;
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                has_content = true;
            }
            '"' if !in_single => {
                in_double = !in_double;
                has_content = true;
            }
            '\\' if in_double => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                has_content = true;
            }
            c if c.is_whitespace() && !in_single && !in_double => {
                if has_content {
                    tokens.push(std::mem::take(&mut current));
                    has_content = false;
                }
            }
            c => {
                current.push(c);
                has_content = true;
            }
        }
    }
    if has_content {
        tokens.push(current);
    }
    tokens
}

/// First whitespace-delimited token, with quotes stripped.
pub fn first_token(cmd: &str) -> Option<String> {
    tokenize(cmd).into_iter().next()
}

/// `cmd` stripped of the benign stderr-redirection idioms
/// (`2>/dev/null`, `2>&1`) the phase-1 redirect guard must not trip on.
pub fn strip_benign_redirects(cmd: &str) -> String {
    let mut result = cmd.to_string();
    for pattern in ["2>/dev/null", "2>&1"] {
        result = result.replace(pattern, "");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_quotes_blanks_interior_only() {
        let masked = mask_quotes(r#"sqlite3 db "SELECT 1;""#);
        assert!(!masked.contains(';'));
        assert!(masked.starts_with("sqlite3 db \""));
    }

    #[test]
    fn contains_unquoted_ignores_quoted_semicolon() {
        assert!(!contains_unquoted(r#"sqlite3 db "SELECT 1;""#, ";"));
        assert!(contains_unquoted("echo hi; rm -rf /", ";"));
    }

    #[test]
    fn quoted_spans_extracts_inline_sql() {
        let spans = quoted_spans(r#"sqlite3 db "SELECT 1;""#);
        assert_eq!(spans, vec!["SELECT 1;".to_string()]);
    }

    #[test]
    fn tokenize_respects_quotes() {
        let tokens = tokenize(r#"docker exec -it "my container" bash"#);
        assert_eq!(tokens, vec!["docker", "exec", "-it", "my container", "bash"]);
    }

    #[test]
    fn strip_benign_redirects_removes_known_idioms() {
        assert_eq!(strip_benign_redirects("cmd 2>/dev/null"), "cmd ");
        assert_eq!(strip_benign_redirects("cmd 2>&1"), "cmd ");
        assert_eq!(strip_benign_redirects("cmd > out.txt"), "cmd > out.txt");
    }
}

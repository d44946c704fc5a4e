//! Leading-keyword statement classification.
//!
//! Classification is advisory: it picks the gateway call the executor tries
//! first and never rejects a statement.

use super::StatementKind;

const DDL_KEYWORDS: &[&str] = &[
    "CREATE", "DROP", "ALTER", "TRUNCATE", "GRANT", "REVOKE", "COMMENT", "ANALYZE", "VACUUM",
];

const DML_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE"];

/// Classifies a statement by its leading keyword, case-insensitively.
///
/// Leading whitespace and `--` / `/* */` comments are skipped before the
/// keyword is read, so `-- note\nSELECT 2` is [`StatementKind::Select`] and a
/// comment-only statement is [`StatementKind::Unknown`]. The keyword is the
/// run of identifier characters at the start of the remaining text, so
/// `SELECT(1)` still reads as `SELECT`.
pub fn classify_statement(sql: &str) -> StatementKind {
    let keyword = leading_keyword(sql).to_ascii_uppercase();

    if DDL_KEYWORDS.contains(&keyword.as_str()) {
        StatementKind::Ddl
    } else if DML_KEYWORDS.contains(&keyword.as_str()) {
        StatementKind::Dml
    } else if keyword == "SELECT" {
        StatementKind::Select
    } else {
        StatementKind::Unknown
    }
}

/// Returns the first keyword of a statement, after whitespace and comments.
fn leading_keyword(sql: &str) -> &str {
    let body = skip_leading_comments(sql);
    let end = body
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    &body[..end]
}

fn skip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = match after.find('\n') {
                Some(pos) => after[pos + 1..].trim_start(),
                None => "",
            };
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(pos) => after[pos + 2..].trim_start(),
                None => "",
            };
        } else {
            return rest;
        }
    }
}

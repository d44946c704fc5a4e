//! Lexical statement splitting.
//!
//! A single left-to-right scan with one state variable. Semicolons only end a
//! statement in the `Normal` state; inside quotes and comments they are copied
//! through like any other character.

/// Lexical context of the scanner at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InSingleQuote,
    InDoubleQuote,
    InLineComment,
    InBlockComment,
}

/// Splits a SQL script into trimmed, non-empty statements in source order.
///
/// The terminating semicolon is removed; everything else, including comments
/// and whitespace inside a statement, is preserved. Unterminated quotes or
/// block comments are not an error: the remaining text becomes the last
/// statement.
///
/// # Examples
///
/// ```
/// use db_sqlbatch::script::split_statements;
///
/// let statements = split_statements("CREATE TABLE t(id INT); INSERT INTO t VALUES (1);");
/// assert_eq!(statements, vec!["CREATE TABLE t(id INT)", "INSERT INTO t VALUES (1)"]);
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::Normal;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::InBlockComment => {
                current.push(ch);
                if ch == '*' && chars.peek() == Some(&'/') {
                    current.extend(chars.next());
                    state = ScanState::Normal;
                }
            }
            ScanState::InLineComment => {
                current.push(ch);
                if ch == '\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::InSingleQuote => {
                current.push(ch);
                if ch == '\'' {
                    state = ScanState::Normal;
                }
            }
            ScanState::InDoubleQuote => {
                current.push(ch);
                if ch == '"' {
                    state = ScanState::Normal;
                }
            }
            ScanState::Normal => match ch {
                '/' if chars.peek() == Some(&'*') => {
                    current.push(ch);
                    current.extend(chars.next());
                    state = ScanState::InBlockComment;
                }
                '-' if chars.peek() == Some(&'-') => {
                    current.push(ch);
                    current.extend(chars.next());
                    state = ScanState::InLineComment;
                }
                '\'' => {
                    current.push(ch);
                    state = ScanState::InSingleQuote;
                }
                '"' => {
                    current.push(ch);
                    state = ScanState::InDoubleQuote;
                }
                ';' => {
                    push_statement(&mut statements, &current);
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, buffer: &str) {
    let stmt = buffer.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
}

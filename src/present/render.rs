//! Plain-text rendering of batch results and row set pages.

use crate::db::{RowSet, Value};
use crate::error::Result;
use crate::query::{BatchResult, BatchStatus, StatementOutcome, StatementResult};
use crate::script::StatementKind;

use super::{paginate, PageView, PresenterConfig};

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders the one-line outcome of a statement, e.g.
/// `Statement 2/5 executed: 3 row(s) affected`.
pub fn render_statement(result: &StatementResult, total: usize) -> String {
    let position = result.position;
    match &result.outcome {
        StatementOutcome::Query { rows } => {
            format!("Statement {position}/{total} executed: Retrieved {} rows", rows.len())
        }
        StatementOutcome::NonQuery { .. } if result.kind == StatementKind::Ddl => {
            format!("Statement {position}/{total} executed: DDL operation completed")
        }
        StatementOutcome::NonQuery { rows_affected } => {
            format!("Statement {position}/{total} executed: {rows_affected} row(s) affected")
        }
        StatementOutcome::Failed { error } => {
            format!("Statement {position}/{total} failed: {error}")
        }
    }
}

/// Renders the counts and overall status of a batch.
pub fn render_summary(batch: &BatchResult) -> String {
    let status = match batch.status() {
        BatchStatus::Empty => return "No valid SQL statements found".to_string(),
        BatchStatus::AllSucceeded => {
            format!("All {} statement(s) executed successfully!", batch.total())
        }
        BatchStatus::PartiallySucceeded => format!(
            "{} statement(s) succeeded, {} statement(s) failed",
            batch.succeeded(),
            batch.failed()
        ),
        BatchStatus::AllFailed => "All statements failed to execute".to_string(),
    };

    format!(
        "Total: {} | Succeeded: {} | Failed: {}\n{}",
        batch.total(),
        batch.succeeded(),
        batch.failed(),
        status
    )
}

/// Renders one page of `rows` as a bordered table followed by a position line.
pub fn render_page(rows: &RowSet, view: &PageView, config: &PresenterConfig) -> String {
    if rows.columns.is_empty() {
        return "(empty result)".to_string();
    }

    let page = view.slice(rows);
    let widths = column_widths(rows, page, config.max_column_width);

    let mut lines = Vec::with_capacity(page.len() + 5);
    lines.push(border(&widths, '┌', '┬', '┐'));
    lines.push(table_row(
        rows.columns.iter().map(|c| c.name.clone()),
        &widths,
    ));
    lines.push(border(&widths, '├', '┼', '┤'));
    for row in page {
        lines.push(table_row(row.iter().map(Value::to_display_string), &widths));
    }
    lines.push(border(&widths, '└', '┴', '┘'));

    if view.total_rows == 0 {
        lines.push("0 rows".to_string());
    } else {
        lines.push(format!(
            "Total rows: {} | Page {} of {} | Showing {} - {}",
            view.total_rows,
            view.page_index,
            view.total_pages,
            view.first_row_number(),
            view.last_row_number()
        ));
    }

    lines.join("\n")
}

/// Renders a whole batch: one line per statement, the summary, and the
/// requested page of the last query result if there is one.
pub fn render_batch(
    batch: &BatchResult,
    config: &PresenterConfig,
    page_index: i64,
) -> Result<String> {
    let mut sections = Vec::new();

    if !batch.is_empty() {
        let statements: Vec<String> = batch
            .iter()
            .map(|result| render_statement(result, batch.total()))
            .collect();
        sections.push(statements.join("\n"));
    }

    sections.push(render_summary(batch));

    if let Some(rows) = batch.last_row_set() {
        let view = paginate(rows, config.page_size, page_index)?;
        sections.push(format!(
            "Last query results\n{}",
            render_page(rows, &view, config)
        ));
    }

    Ok(sections.join("\n\n"))
}

fn column_widths(rows: &RowSet, page: &[Vec<Value>], max_width: usize) -> Vec<usize> {
    let max_width = max_width.max(MIN_COLUMN_WIDTH);
    let mut widths: Vec<usize> = rows
        .columns
        .iter()
        .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    for row in page {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.to_display_string().chars().count());
        }
    }

    widths.into_iter().map(|w| w.min(max_width)).collect()
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    let mid = mid.to_string();
    format!("{left}{}{right}", segments.join(mid.as_str()))
}

fn table_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (cell, &width) in cells.zip(widths) {
        let cell = truncate(&cell, width);
        line.push_str(&format!(" {cell:width$} │"));
    }
    line
}

/// Truncates to `max_width` characters, ending in `...` when shortened.
fn truncate(s: &str, max_width: usize) -> String {
    let flattened = s.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_width {
        flattened
    } else if max_width <= 3 {
        flattened.chars().take(max_width).collect()
    } else {
        let kept: String = flattened.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}

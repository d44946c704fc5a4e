//! Full row set export to CSV and JSON.
//!
//! Exports always cover every row, regardless of the page being displayed.

use std::path::Path;

use serde_json::{json, Map, Number};
use tracing::info;

use crate::db::{RowSet, Value};
use crate::error::{Result, SqlBatchError};
use crate::query::BatchResult;

/// Renders `rows` as RFC 4180 CSV with a header line and CRLF line endings.
///
/// NULL becomes an empty field. Binary values are written as `\x`-prefixed
/// hex.
pub fn to_csv(rows: &RowSet) -> String {
    let mut out = String::new();

    let header: Vec<String> = rows.columns.iter().map(|c| csv_field(&c.name)).collect();
    out.push_str(&header.join(","));
    out.push_str("\r\n");

    for row in &rows.rows {
        let fields: Vec<String> = row.iter().map(csv_value).collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }

    out
}

/// Writes the CSV export of `rows` to `path`.
pub fn write_csv(rows: &RowSet, path: &Path) -> Result<()> {
    std::fs::write(path, to_csv(rows)).map_err(|e| {
        SqlBatchError::io(format!("Failed to write CSV to {}: {e}", path.display()))
    })?;
    info!(rows = rows.len(), path = %path.display(), "Exported CSV");
    Ok(())
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bytes(bytes) => hex(bytes),
        Value::String(s) => csv_field(s),
        other => other.to_display_string(),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => serde_json::Value::String(hex(bytes)),
    }
}

/// Converts `rows` to `{"columns": [...], "rows": [{column: value}, ...]}`.
pub fn row_set_to_json(rows: &RowSet) -> serde_json::Value {
    let columns: Vec<serde_json::Value> = rows
        .columns
        .iter()
        .map(|c| json!({ "name": c.name, "type": c.data_type }))
        .collect();

    let records: Vec<serde_json::Value> = rows
        .rows
        .iter()
        .map(|row| {
            let record: Map<String, serde_json::Value> = rows
                .columns
                .iter()
                .zip(row)
                .map(|(col, value)| (col.name.clone(), value_to_json(value)))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();

    json!({ "columns": columns, "rows": records })
}

/// Converts a batch to a JSON report with a summary and every statement result.
pub fn batch_to_json(batch: &BatchResult) -> Result<serde_json::Value> {
    let mut results = Vec::with_capacity(batch.total());
    for result in batch {
        let mut entry = serde_json::to_value(result)
            .map_err(|e| SqlBatchError::internal(format!("Failed to serialize result: {e}")))?;
        if let Some(rows) = result.row_set() {
            entry["rows"] = row_set_to_json(rows);
        }
        results.push(entry);
    }

    Ok(json!({
        "summary": {
            "total": batch.total(),
            "succeeded": batch.succeeded(),
            "failed": batch.failed(),
            "status": batch.status(),
        },
        "results": results,
    }))
}

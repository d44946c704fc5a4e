//! Statement and batch result types.
//!
//! A statement outcome is a tagged union, so a result can never carry both
//! rows and an error.

use crate::db::RowSet;
use crate::error::{Result, SqlBatchError};
use crate::script::StatementKind;
use serde::Serialize;
use std::time::Duration;

/// What happened when one statement ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatementOutcome {
    /// The query path succeeded and produced rows.
    Query { rows: RowSet },
    /// The non-query path succeeded; the count is clamped to zero or more.
    NonQuery { rows_affected: u64 },
    /// The gateway rejected the statement.
    Failed { error: String },
}

/// Outcome of executing one statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementResult {
    /// 1-based position of the statement in its batch.
    pub position: usize,

    /// The statement text as split from the script.
    pub statement: String,

    /// The kind actually used for execution. An `Unknown` statement resolves
    /// to `Select` or `Dml` depending on which path succeeded, and stays
    /// `Unknown` when both fail.
    pub kind: StatementKind,

    /// Rows, affected count, or error.
    #[serde(flatten)]
    pub outcome: StatementOutcome,

    /// Wall-clock time spent in the gateway.
    #[serde(rename = "execution_time_ms", serialize_with = "serialize_millis")]
    pub execution_time: Duration,

    /// Error from the query attempt of an `Unknown` statement that then went
    /// down the non-query path. Diagnostic only; it never decides success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded_error: Option<String>,
}

impl StatementResult {
    /// Returns true if the statement succeeded.
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, StatementOutcome::Failed { .. })
    }

    /// Returns the row set of a successful query.
    pub fn row_set(&self) -> Option<&RowSet> {
        match &self.outcome {
            StatementOutcome::Query { rows } => Some(rows),
            _ => None,
        }
    }

    /// Number of rows retrieved by a query, 0 otherwise.
    pub fn rows_retrieved(&self) -> usize {
        self.row_set().map_or(0, RowSet::len)
    }

    /// Number of rows affected by a non-query, 0 otherwise.
    pub fn rows_affected(&self) -> u64 {
        match self.outcome {
            StatementOutcome::NonQuery { rows_affected } => rows_affected,
            _ => 0,
        }
    }

    /// Returns the error message of a failed statement.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            StatementOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Overall status of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// The script contained no statements.
    Empty,
    /// Every statement succeeded.
    AllSucceeded,
    /// Some statements succeeded and some failed.
    PartiallySucceeded,
    /// Every statement failed.
    AllFailed,
}

/// Ordered results for every statement of one script.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    /// Per-statement results in script order.
    pub results: Vec<StatementResult>,
}

impl BatchResult {
    /// Creates a batch result from per-statement results.
    pub fn new(results: Vec<StatementResult>) -> Self {
        Self { results }
    }

    /// Number of statements executed.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of statements that succeeded.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of statements that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Returns true if the script produced no statements.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Classifies the batch by how many statements succeeded.
    pub fn status(&self) -> BatchStatus {
        let succeeded = self.succeeded();
        if self.is_empty() {
            BatchStatus::Empty
        } else if succeeded == self.total() {
            BatchStatus::AllSucceeded
        } else if succeeded == 0 {
            BatchStatus::AllFailed
        } else {
            BatchStatus::PartiallySucceeded
        }
    }

    /// Row set of the last statement that returned rows successfully.
    pub fn last_row_set(&self) -> Option<&RowSet> {
        self.results.iter().rev().find_map(StatementResult::row_set)
    }

    /// Iterates over per-statement results in script order.
    pub fn iter(&self) -> std::slice::Iter<'_, StatementResult> {
        self.results.iter()
    }

    /// Turns an empty batch into [`SqlBatchError::EmptyInput`] for hosts that
    /// want to treat it as a user-facing warning.
    pub fn ensure_not_empty(self) -> Result<Self> {
        if self.is_empty() {
            Err(SqlBatchError::EmptyInput)
        } else {
            Ok(self)
        }
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a StatementResult;
    type IntoIter = std::slice::Iter<'a, StatementResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}

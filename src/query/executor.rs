//! Single-statement execution.
//!
//! Routes a classified statement to the matching gateway call and turns the
//! outcome into a [`StatementResult`]. Gateway failures are captured in the
//! result; nothing here returns `Err`.

use std::time::Instant;

use tracing::{debug, warn};

use crate::db::{DatabaseGateway, RowSet};
use crate::error::Result;
use crate::script::StatementKind;

use super::{StatementOutcome, StatementResult};

/// Executes individual statements against a database gateway.
pub struct StatementExecutor<'a> {
    gateway: &'a dyn DatabaseGateway,
}

impl<'a> StatementExecutor<'a> {
    /// Creates a new statement executor.
    pub fn new(gateway: &'a dyn DatabaseGateway) -> Self {
        Self { gateway }
    }

    /// Runs one statement using the path its kind selects. The result is
    /// numbered as position 1; batch callers renumber it.
    ///
    /// `Unknown` statements try the query path first and fall back to the
    /// non-query path. Only the second attempt decides the outcome; the first
    /// error is kept in [`StatementResult::discarded_error`].
    pub async fn execute(&self, sql: &str, kind: StatementKind) -> StatementResult {
        debug!(%kind, "Executing statement");
        let start = Instant::now();

        let (resolved_kind, outcome, discarded_error) = match kind {
            StatementKind::Ddl | StatementKind::Dml => {
                (kind, into_outcome(self.non_query(sql).await), None)
            }
            StatementKind::Select => (kind, into_outcome(self.query(sql).await), None),
            StatementKind::Unknown => self.execute_unknown(sql).await,
        };

        let execution_time = start.elapsed();

        if let StatementOutcome::Failed { error } = &outcome {
            warn!(kind = %resolved_kind, %error, "Statement failed");
        }

        StatementResult {
            position: 1,
            statement: sql.to_string(),
            kind: resolved_kind,
            outcome,
            execution_time,
            discarded_error,
        }
    }

    async fn execute_unknown(
        &self,
        sql: &str,
    ) -> (StatementKind, StatementOutcome, Option<String>) {
        let first_error = match self.query(sql).await {
            Ok(outcome) => return (StatementKind::Select, outcome, None),
            Err(e) => e.to_string(),
        };

        debug!(error = %first_error, "Query path failed, retrying as non-query");

        match self.non_query(sql).await {
            Ok(outcome) => (StatementKind::Dml, outcome, Some(first_error)),
            Err(e) => (
                StatementKind::Unknown,
                StatementOutcome::Failed {
                    error: e.to_string(),
                },
                Some(first_error),
            ),
        }
    }

    async fn query(&self, sql: &str) -> Result<StatementOutcome> {
        let rows: RowSet = self.gateway.run_query(sql).await?;
        debug!(rows_retrieved = rows.len(), "Query succeeded");
        Ok(StatementOutcome::Query { rows })
    }

    async fn non_query(&self, sql: &str) -> Result<StatementOutcome> {
        let reported = self.gateway.run_non_query(sql).await?;
        let rows_affected = u64::try_from(reported).unwrap_or(0);
        debug!(rows_affected, "Non-query succeeded");
        Ok(StatementOutcome::NonQuery { rows_affected })
    }
}

fn into_outcome(result: Result<StatementOutcome>) -> StatementOutcome {
    result.unwrap_or_else(|e| StatementOutcome::Failed {
        error: e.to_string(),
    })
}

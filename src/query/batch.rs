//! Batch execution of multi-statement scripts.

use std::time::Instant;

use tracing::info;

use crate::db::DatabaseGateway;
use crate::script::{classify_statement, split_statements};

use super::{BatchResult, StatementExecutor, StatementResult};

/// Runs every statement of a script in order against one gateway.
///
/// A failing statement never stops the batch. Statements are awaited one at a
/// time, so each sees the effects of those before it.
pub struct BatchExecutor<'a> {
    executor: StatementExecutor<'a>,
}

impl<'a> BatchExecutor<'a> {
    /// Creates a new batch executor.
    pub fn new(gateway: &'a dyn DatabaseGateway) -> Self {
        Self {
            executor: StatementExecutor::new(gateway),
        }
    }

    /// Splits, classifies and executes `script`.
    pub async fn run(&self, script: &str) -> BatchResult {
        self.run_with(script, |_, _, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_statement(position, total, result)`
    /// after each statement. `position` is 1-based.
    pub async fn run_with<F>(&self, script: &str, mut on_statement: F) -> BatchResult
    where
        F: FnMut(usize, usize, &StatementResult),
    {
        let statements = split_statements(script);
        let total = statements.len();

        if total == 0 {
            info!("Script contains no statements");
            return BatchResult::default();
        }

        info!(statements = total, "Executing batch");
        let start = Instant::now();

        let mut results = Vec::with_capacity(total);
        for (index, statement) in statements.iter().enumerate() {
            let kind = classify_statement(statement);
            let mut result = self.executor.execute(statement, kind).await;
            result.position = index + 1;
            on_statement(index + 1, total, &result);
            results.push(result);
        }

        let batch = BatchResult::new(results);
        info!(
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );
        batch
    }
}

/// Convenience wrapper around [`BatchExecutor::run`].
pub async fn run_script(script: &str, gateway: &dyn DatabaseGateway) -> BatchResult {
    BatchExecutor::new(gateway).run(script).await
}

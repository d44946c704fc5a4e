//! Mock database gateways for testing.
//!
//! Provides scripted in-memory gateways for exercising the executor without a
//! live database.

use super::{ColumnInfo, DatabaseGateway, RowSet, Value};
use crate::error::{Result, SqlBatchError};
use async_trait::async_trait;
use std::sync::Mutex;

/// A gateway call recorded by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `run_query` was called with this SQL.
    Query(String),
    /// `run_non_query` was called with this SQL.
    NonQuery(String),
}

#[derive(Debug, Clone)]
enum Response {
    Rows(RowSet),
    Affected(i64),
    Fail(String),
}

/// A mock gateway that returns scripted results and records every call.
///
/// Rules match when the statement contains their fragment; the first matching
/// rule wins. Unmatched reads (`SELECT`/`WITH`) return a one-row result,
/// unmatched non-queries report zero affected rows, and any other statement
/// sent to `run_query` fails because it produces no result set.
#[derive(Debug, Default)]
pub struct MockGateway {
    rules: Vec<(String, Response)>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    /// Creates a new mock gateway with no scripted rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `rows` from `run_query` for statements containing `fragment`.
    pub fn with_rows(mut self, fragment: impl Into<String>, rows: RowSet) -> Self {
        self.rules.push((fragment.into(), Response::Rows(rows)));
        self
    }

    /// Reports `count` affected rows for statements containing `fragment`.
    pub fn with_affected(mut self, fragment: impl Into<String>, count: i64) -> Self {
        self.rules.push((fragment.into(), Response::Affected(count)));
        self
    }

    /// Fails both operations for statements containing `fragment`.
    pub fn fail_on(mut self, fragment: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules
            .push((fragment.into(), Response::Fail(message.into())));
        self
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn lookup(&self, sql: &str) -> Option<&Response> {
        self.rules
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, response)| response)
    }
}

#[async_trait]
impl DatabaseGateway for MockGateway {
    async fn run_query(&self, sql: &str) -> Result<RowSet> {
        self.record(GatewayCall::Query(sql.to_string()));

        match self.lookup(sql) {
            Some(Response::Rows(rows)) => Ok(rows.clone()),
            Some(Response::Fail(message)) => Err(SqlBatchError::gateway(message.clone())),
            Some(Response::Affected(_)) => Err(no_result_set()),
            None => {
                let sql_upper = sql.trim_start().to_uppercase();
                if sql_upper.starts_with("SELECT") || sql_upper.starts_with("WITH") {
                    Ok(RowSet::with_data(
                        vec![ColumnInfo::new("result", "text")],
                        vec![vec![Value::String(format!("Mock result for: {sql}"))]],
                    ))
                } else {
                    Err(no_result_set())
                }
            }
        }
    }

    async fn run_non_query(&self, sql: &str) -> Result<i64> {
        self.record(GatewayCall::NonQuery(sql.to_string()));

        match self.lookup(sql) {
            Some(Response::Affected(count)) => Ok(*count),
            Some(Response::Fail(message)) => Err(SqlBatchError::gateway(message.clone())),
            Some(Response::Rows(_)) | None => Ok(0),
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

fn no_result_set() -> SqlBatchError {
    SqlBatchError::gateway("Statement does not return rows")
}

/// A gateway that rejects every statement with the same message.
#[derive(Debug, Clone)]
pub struct FailingGateway {
    message: String,
}

impl FailingGateway {
    /// Creates a gateway whose every call fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseGateway for FailingGateway {
    async fn run_query(&self, _sql: &str) -> Result<RowSet> {
        Err(SqlBatchError::gateway(self.message.clone()))
    }

    async fn run_non_query(&self, _sql: &str) -> Result<i64> {
        Err(SqlBatchError::gateway(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

//! SQLite database gateway implementation.
//!
//! Provides the `SqliteGateway` struct that implements the `DatabaseGateway`
//! trait for SQLite files and in-memory databases using sqlx.

use crate::config::{ConnectionConfig, ExecutionConfig};
use crate::db::{ColumnInfo, DatabaseGateway, Row, RowSet, Value};
use crate::error::{Result, SqlBatchError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{
    Column as SqlxColumn, Executor, Row as SqlxRow, Statement as SqlxStatement, TypeInfo,
    ValueRef,
};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const MEMORY_DATABASE: &str = ":memory:";

/// SQLite database gateway.
#[derive(Debug)]
pub struct SqliteGateway {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteGateway {
    /// Opens the SQLite database named by `config.database`.
    ///
    /// `:memory:` opens a private in-memory database. The pool holds a single
    /// connection so every statement sees the same database.
    pub async fn connect(config: &ConnectionConfig, execution: &ExecutionConfig) -> Result<Self> {
        let path = config
            .database
            .as_deref()
            .ok_or_else(|| SqlBatchError::config("SQLite database path is required"))?;

        let options = if path == MEMORY_DATABASE {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| SqlBatchError::config(format!("Invalid database path: {e}")))?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };
        let options = options.busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                SqlBatchError::connection(format!("Failed to open SQLite database {path}: {e}"))
            })?;

        info!("SQLite database opened at {}", path);

        Ok(Self {
            pool,
            timeout: execution.query_timeout(),
        })
    }

    /// Opens a fresh in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect(
            &ConnectionConfig::sqlite(MEMORY_DATABASE),
            &ExecutionConfig::default(),
        )
        .await
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                SqlBatchError::gateway(format!(
                    "Query timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| SqlBatchError::gateway(format_query_error(e)))
    }
}

#[async_trait]
impl DatabaseGateway for SqliteGateway {
    async fn run_query(&self, sql: &str) -> Result<RowSet> {
        let statement = self.with_timeout((&self.pool).prepare(sql)).await?;
        if statement.columns().is_empty() {
            return Err(SqlBatchError::gateway("Statement does not return rows"));
        }

        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        let rows = self
            .with_timeout(sqlx::query(sql).persistent(false).fetch_all(&self.pool))
            .await?;

        debug!(rows = rows.len(), "Query returned rows");

        Ok(RowSet::with_data(
            columns,
            rows.iter().map(convert_row).collect(),
        ))
    }

    async fn run_non_query(&self, sql: &str) -> Result<i64> {
        let result = self
            .with_timeout(sqlx::raw_sql(sql).execute(&self.pool))
            .await?;

        Ok(i64::try_from(result.rows_affected()).unwrap_or(i64::MAX))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

/// Converts one cell using the storage class of the stored value.
///
/// SQLite typing is per value, not per column, so the declared column type
/// is not consulted.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => format!("ERROR: {}", db_error.message()),
        None => error.to_string(),
    }
}

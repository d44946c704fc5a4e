//! Database gateway layer for db-sqlbatch.
//!
//! Provides a trait-based interface for running single statements, allowing
//! different database backends to be used interchangeably by the executor.

mod mock;
mod postgres;
mod sqlite;
mod types;

pub use mock::{FailingGateway, GatewayCall, MockGateway};
pub use postgres::PostgresGateway;
pub use sqlite::SqliteGateway;
pub use types::{ColumnInfo, Row, RowSet, Value};

use crate::config::{ConnectionConfig, ExecutionConfig};
use crate::error::Result;
use async_trait::async_trait;

/// Affected-row count returned when the driver does not report one.
pub const ROWS_NOT_REPORTED: i64 = -1;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the URL scheme for this backend.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Creates a database gateway for the given backend and configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(
    config: &ConnectionConfig,
    execution: &ExecutionConfig,
) -> Result<Box<dyn DatabaseGateway>> {
    match config.backend {
        DatabaseBackend::Postgres => {
            let gateway = PostgresGateway::connect(config, execution).await?;
            Ok(Box::new(gateway))
        }
        DatabaseBackend::Sqlite => {
            let gateway = SqliteGateway::connect(config, execution).await?;
            Ok(Box::new(gateway))
        }
    }
}

/// Runs single statements against a backing store.
///
/// Callers await each call to completion before issuing the next one.
/// Serializing concurrent callers, transactions, and timeouts are the
/// implementation's concern.
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Runs a read-style statement and returns its rows.
    ///
    /// Fails when the statement does not produce a result set.
    async fn run_query(&self, sql: &str) -> Result<RowSet>;

    /// Runs a write or DDL statement and returns the affected-row count.
    ///
    /// A negative count (see [`ROWS_NOT_REPORTED`]) means the driver did not
    /// report one.
    async fn run_non_query(&self, sql: &str) -> Result<i64>;

    /// Closes the underlying connection.
    async fn close(&self) -> Result<()>;
}

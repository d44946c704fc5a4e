//! Batch execution against PostgreSQL.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable to run them.

use db_sqlbatch::config::{ConnectionConfig, ExecutionConfig};
use db_sqlbatch::db::{DatabaseGateway, PostgresGateway, Value};
use db_sqlbatch::query::{run_script, BatchStatus};
use db_sqlbatch::script::StatementKind;
use std::time::{SystemTime, UNIX_EPOCH};

/// Helper to create a test gateway.
async fn get_test_gateway() -> Option<PostgresGateway> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresGateway::connect(&config, &ExecutionConfig::default())
        .await
        .ok()
}

/// A table name no other test run will use.
fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}_{}_{nanos}", std::process::id())
}

#[tokio::test]
async fn test_batch_with_failures_on_postgres() {
    let Some(gateway) = get_test_gateway().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let table = unique_table("sqlbatch_it");
    let script = format!(
        "CREATE TABLE {table} (id serial PRIMARY KEY, label text NOT NULL);
         INSERT INTO {table} (label) VALUES ('one'), ('two;still two');
         INSERT INTO {table}_missing (label) VALUES ('x');
         UPDATE {table} SET label = 'ONE' WHERE label = 'one';
         INSERT INTO {table} (label) VALUES (NULL);
         SELECT id, label FROM {table} ORDER BY id;
         DROP TABLE {table};"
    );

    let batch = run_script(&script, &gateway).await;

    assert_eq!(batch.total(), 7);
    assert_eq!(batch.failed(), 2);
    assert_eq!(batch.succeeded(), 5);
    assert_eq!(batch.status(), BatchStatus::PartiallySucceeded);

    assert_eq!(batch.results[1].rows_affected(), 2);
    assert!(batch.results[2].error().unwrap().contains("does not exist"));
    assert_eq!(batch.results[3].rows_affected(), 1);
    assert!(batch.results[4].error().unwrap().contains("null value"));

    let rows = batch.last_row_set().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.get(0, "label"), Some(&Value::from("ONE")));
    assert_eq!(rows.get(1, "label"), Some(&Value::from("two;still two")));
    assert!(batch.results[6].is_success());

    gateway.close().await.unwrap();
}

#[tokio::test]
async fn test_unknown_statements_on_postgres() {
    let Some(gateway) = get_test_gateway().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let batch = run_script(
        "WITH t AS (SELECT 1 AS n) SELECT n FROM t; SET application_name = 'sqlbatch'; SHOW application_name",
        &gateway,
    )
    .await;

    assert_eq!(batch.failed(), 0);
    assert_eq!(batch.results[0].kind, StatementKind::Select);
    assert_eq!(batch.results[1].kind, StatementKind::Dml);
    assert_eq!(batch.results[2].kind, StatementKind::Select);

    gateway.close().await.unwrap();
}

//! Batch execution against a real in-memory SQLite database.

use db_sqlbatch::db::{DatabaseGateway, SqliteGateway, Value};
use db_sqlbatch::present::{paginate, to_csv};
use db_sqlbatch::query::{run_script, BatchStatus, StatementExecutor};
use db_sqlbatch::script::StatementKind;
use pretty_assertions::assert_eq;

async fn gateway() -> SqliteGateway {
    SqliteGateway::in_memory()
        .await
        .expect("in-memory SQLite should open")
}

#[tokio::test]
async fn test_mixed_script_reports_every_statement() {
    let gateway = gateway().await;
    let script = "
        CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        INSERT INTO users (name) VALUES ('ada'), ('grace');
        UPDATE users SET name = 'Ada' WHERE name = 'ada';
        SELECT id, name FROM users ORDER BY id;
    ";

    let batch = run_script(script, &gateway).await;

    assert_eq!(batch.status(), BatchStatus::AllSucceeded);
    let kinds: Vec<StatementKind> = batch.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StatementKind::Ddl,
            StatementKind::Dml,
            StatementKind::Dml,
            StatementKind::Select
        ]
    );
    assert_eq!(batch.results[1].rows_affected(), 2);
    assert_eq!(batch.results[2].rows_affected(), 1);

    let rows = batch.results[3].row_set().unwrap();
    assert_eq!(rows.column_names(), vec!["id", "name"]);
    assert_eq!(rows.get(0, "name"), Some(&Value::from("Ada")));
    assert_eq!(rows.get(1, "name"), Some(&Value::from("grace")));
}

#[tokio::test]
async fn test_failures_are_counted_and_later_statements_still_run() {
    let gateway = gateway().await;
    let script = "
        CREATE TABLE audit (step INTEGER);
        INSERT INTO audit VALUES (1);
        INSERT INTO no_such_table VALUES (1);
        INSERT INTO audit VALUES (2);
        SELECT * FROM also_missing;
        INSERT INTO audit VALUES (3);
        DELETE FROM missing_too;
        SELECT step FROM audit ORDER BY step;
    ";

    let batch = run_script(script, &gateway).await;

    assert_eq!(batch.total(), 8);
    assert_eq!(batch.failed(), 3);
    assert_eq!(batch.succeeded(), 5);
    assert_eq!(batch.status(), BatchStatus::PartiallySucceeded);

    let failed_positions: Vec<usize> = batch
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.position)
        .collect();
    assert_eq!(failed_positions, vec![3, 5, 7]);
    assert!(batch.results[2].error().unwrap().contains("no such table"));

    // Every insert after a failure took effect.
    let steps = batch.last_row_set().unwrap();
    let values: Vec<&Value> = (0..steps.len())
        .filter_map(|i| steps.get(i, "step"))
        .collect();
    assert_eq!(values, vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
}

#[tokio::test]
async fn test_semicolons_inside_literals_and_comments() {
    let gateway = gateway().await;
    let script = "
        CREATE TABLE notes (body TEXT); -- trailing; comment
        /* block; comment */ INSERT INTO notes VALUES ('a;b'), ('it''s; fine');
        SELECT body FROM notes ORDER BY body
    ";

    let batch = run_script(script, &gateway).await;

    assert_eq!(batch.total(), 3);
    assert_eq!(batch.failed(), 0);
    let rows = batch.last_row_set().unwrap();
    assert_eq!(rows.get(0, "body"), Some(&Value::from("a;b")));
    assert_eq!(rows.get(1, "body"), Some(&Value::from("it's; fine")));
}

#[tokio::test]
async fn test_unknown_statements_resolve_by_outcome() {
    let gateway = gateway().await;
    let script = "
        CREATE TABLE t (x INTEGER);
        INSERT INTO t VALUES (1), (2), (3);
        WITH doubled AS (SELECT x * 2 AS y FROM t) SELECT y FROM doubled;
        REPLACE INTO t VALUES (4);
        FROBNICATE t;
    ";

    let batch = run_script(script, &gateway).await;

    let with_query = &batch.results[2];
    assert_eq!(with_query.kind, StatementKind::Select);
    assert_eq!(with_query.rows_retrieved(), 3);
    assert!(with_query.discarded_error.is_none());

    let replace = &batch.results[3];
    assert!(replace.is_success());
    assert_eq!(replace.kind, StatementKind::Dml);
    assert_eq!(replace.rows_affected(), 1);
    assert!(replace.discarded_error.is_some());

    let nonsense = &batch.results[4];
    assert!(!nonsense.is_success());
    assert_eq!(nonsense.kind, StatementKind::Unknown);
    assert!(nonsense.error().unwrap().contains("syntax error"));
}

#[tokio::test]
async fn test_empty_script_touches_nothing() {
    let gateway = gateway().await;

    let batch = run_script("  ;  -- nothing here\n ; ", &gateway).await;

    // A lone comment is a statement; only blank fragments are dropped.
    assert_eq!(batch.total(), 1);

    let batch = run_script("CREATE TABLE done_t (x INTEGER); -- done", &gateway).await;
    assert_eq!(batch.total(), 2);
    let trailing = &batch.results[1];
    assert_eq!(trailing.statement, "-- done");
    assert!(trailing.is_success());
    assert_eq!(trailing.kind, StatementKind::Dml);
    assert!(trailing.discarded_error.is_some());

    let batch = run_script(" ; ;\n\t; ", &gateway).await;
    assert!(batch.is_empty());
    assert_eq!(batch.status(), BatchStatus::Empty);
    assert!(batch.ensure_not_empty().is_err());
}

#[tokio::test]
async fn test_single_statement_executor_on_sqlite() {
    let gateway = gateway().await;
    let executor = StatementExecutor::new(&gateway);

    let result = executor
        .execute("CREATE TABLE single (id INTEGER)", StatementKind::Ddl)
        .await;
    assert!(result.is_success());
    assert!(result.row_set().is_none());

    let result = executor
        .execute("SELECT count(*) AS n FROM single", StatementKind::Select)
        .await;
    assert_eq!(result.row_set().unwrap().get(0, "n"), Some(&Value::Int(0)));

    gateway.close().await.unwrap();
}

#[tokio::test]
async fn test_large_result_pages_and_exports_in_full() {
    let gateway = gateway().await;
    let script = "
        CREATE TABLE nums (n INTEGER);
        WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 1234)
            INSERT INTO nums SELECT n FROM seq;
        SELECT n FROM nums ORDER BY n;
    ";

    let batch = run_script(script, &gateway).await;
    assert_eq!(batch.failed(), 0, "{:?}", batch.results);
    assert_eq!(batch.results[1].kind, StatementKind::Dml);
    assert_eq!(batch.results[1].rows_affected(), 1234);

    let rows = batch.last_row_set().unwrap();
    assert_eq!(rows.len(), 1234);

    let view = paginate(rows, 100, 13).unwrap();
    assert_eq!(view.total_pages, 13);
    assert_eq!(view.slice(rows).len(), 34);
    assert_eq!(view.slice(rows)[0], vec![Value::Int(1201)]);

    let csv = to_csv(rows);
    assert_eq!(csv.lines().count(), 1235);
}

//! End-to-end tests of the `sqlbatch` binary.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};

fn sqlbatch(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlbatch"))
        .args(args)
        .env("SQLBATCH_CONFIG", config_dir.join("config.toml"))
        .env_remove("DATABASE_URL")
        .env("RUST_LOG", "warn")
        .output()
        .expect("sqlbatch should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_mock_db_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlbatch(
        dir.path(),
        &["--mock-db", "-e", "SELECT 1; CREATE TABLE t (x int); DELETE FROM t"],
    );

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Statement 1/3 executed: Retrieved 1 rows"));
    assert!(text.contains("Statement 2/3 executed: DDL operation completed"));
    assert!(text.contains("Statement 3/3 executed: 0 row(s) affected"));
    assert!(text.contains("All 3 statement(s) executed successfully!"));
    assert!(text.contains("Last query results"));
}

#[test]
fn test_empty_script_exits_with_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlbatch(dir.path(), &["--mock-db", "-e", " ;; \n ; "]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No valid SQL statements found"));
}

#[test]
fn test_failed_statement_exits_with_1_after_running_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let script = "CREATE TABLE t (x INTEGER);\
                  INSERT INTO missing VALUES (1);\
                  INSERT INTO t VALUES (1), (2);\
                  SELECT x FROM t ORDER BY x";
    let output = sqlbatch(dir.path(), &["sqlite::memory:", "-e", script]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("Statement 2/4 failed:"));
    assert!(text.contains("Statement 3/4 executed: 2 row(s) affected"));
    assert!(text.contains("3 statement(s) succeeded, 1 statement(s) failed"));
    assert!(text.contains("Total rows: 2 | Page 1 of 1 | Showing 1 - 2"));
}

#[test]
fn test_script_file_with_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("script.sql");
    std::fs::write(
        &script_path,
        "CREATE TABLE kv (k TEXT, v INTEGER);\n\
         INSERT INTO kv VALUES ('a;1', 1), ('b', 2);\n\
         SELECT k, v FROM kv ORDER BY k;\n",
    )
    .unwrap();

    let output = sqlbatch(
        dir.path(),
        &[
            "sqlite::memory:",
            "-f",
            &script_path.display().to_string(),
            "--output",
            "json",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["status"], "all_succeeded");
    assert_eq!(report["results"][1]["rows_affected"], 2);
    assert_eq!(report["results"][2]["rows"]["rows"][0]["k"], "a;1");
}

#[test]
fn test_csv_export_is_not_paginated() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data.db");
    let csv_path = dir.path().join("out.csv");
    let script = "CREATE TABLE n (i INTEGER);\
                  WITH RECURSIVE s(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM s WHERE i < 120) \
                  INSERT INTO n SELECT i FROM s;\
                  SELECT i FROM n ORDER BY i";

    let output = sqlbatch(
        dir.path(),
        &[
            &format!("sqlite:{}", db_path.display()),
            "-e",
            script,
            "--page",
            "3",
            "--page-size",
            "50",
            "--csv",
            &csv_path.display().to_string(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Total rows: 120 | Page 3 of 3 | Showing 101 - 120"));

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 121);
    assert!(csv.starts_with("i\r\n1\r\n"));
    assert!(db_path.exists());
}

#[test]
fn test_named_connection_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("named.db");
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "[connections.local]\nbackend = \"sqlite\"\ndatabase = \"{}\"\n",
            db_path.display()
        ),
    )
    .unwrap();

    let output = sqlbatch(dir.path(), &["-c", "local", "-e", "SELECT 42 AS answer"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("│ 42     │"));
}

#[test]
fn test_missing_connection_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = sqlbatch(dir.path(), &["-e", "SELECT 1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No database connection configured"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_zero_page_size_is_rejected_before_anything_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("untouched.db");
    let output = sqlbatch(
        dir.path(),
        &[
            &format!("sqlite:{}", db_path.display()),
            "-e",
            "CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1); SELECT x FROM t",
            "--page-size",
            "0",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--page-size must be greater than zero"));
    assert!(output.stdout.is_empty());
    assert!(!db_path.exists());
}

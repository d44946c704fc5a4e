//! Integration tests for db-sqlbatch.

pub mod batch_test;
pub mod cli_test;
pub mod postgres_test;

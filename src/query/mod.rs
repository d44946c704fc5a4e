//! Statement and batch execution.
//!
//! Executes split and classified statements against a
//! [`DatabaseGateway`](crate::db::DatabaseGateway) and collects per-statement
//! results.

mod batch;
mod executor;
mod result;

pub use batch::{run_script, BatchExecutor};
pub use executor::StatementExecutor;
pub use result::{BatchResult, BatchStatus, StatementOutcome, StatementResult};

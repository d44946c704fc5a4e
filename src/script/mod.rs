//! SQL script handling.
//!
//! Splits raw SQL text into individual statements and labels each one by its
//! leading keyword so the executor can route it to the right gateway call.

mod classifier;
mod splitter;

pub use classifier::classify_statement;
pub use splitter::split_statements;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind of a single statement, derived from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Schema and object management (CREATE, DROP, ALTER, ...).
    Ddl,
    /// Data modification (INSERT, UPDATE, DELETE).
    Dml,
    /// Read queries starting with SELECT.
    Select,
    /// Anything else, including CTEs and dialect-specific commands.
    Unknown,
}

impl StatementKind {
    /// Returns true if statements of this kind go through the non-query path.
    pub fn is_non_query(&self) -> bool {
        matches!(self, Self::Ddl | Self::Dml)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ddl => write!(f, "DDL"),
            Self::Dml => write!(f, "DML"),
            Self::Select => write!(f, "SELECT"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

//! Error types for db-sqlbatch.
//!
//! Defines the main error enum used throughout the crate. Per-statement gateway
//! failures are captured into statement results and never escape a batch run;
//! only programmer errors and host-level failures surface as `Err`.

use thiserror::Error;

/// Main error type for db-sqlbatch operations.
#[derive(Error, Debug)]
pub enum SqlBatchError {
    /// The script contained no executable statements.
    #[error("No valid SQL statements found")]
    EmptyInput,

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected a statement (syntax error, constraint violation, etc.)
    #[error("Query error: {0}")]
    Gateway(String),

    /// A caller passed an argument outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading scripts or writing exports failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SqlBatchError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a gateway error with the given message.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Creates an invalid-argument error with the given message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Empty Input",
            Self::Connection(_) => "Connection Error",
            Self::Gateway(_) => "Query Error",
            Self::InvalidArgument(_) => "Invalid Argument",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for SqlBatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias using SqlBatchError.
pub type Result<T> = std::result::Result<T, SqlBatchError>;

//! db-sqlbatch - split, classify and execute multi-statement SQL scripts.
//!
//! A script is split into statements ([`script`]), each statement is
//! classified and executed in order against a [`db::DatabaseGateway`]
//! ([`query`]), and the collected results are paginated, rendered or exported
//! ([`present`]).

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod present;
pub mod query;
pub mod script;

//! om-db - Database abstraction layer for objmigrate
//!
//! This crate provides the `Database` and `MigrationLedger` traits and their
//! DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, LedgerEntry, MigrationLedger, LEDGER_TABLE};

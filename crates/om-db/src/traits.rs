//! Database trait definitions

use crate::error::DbResult;
use om_core::Version;

/// Name of the table recording the applied schema version
pub const LEDGER_TABLE: &str = "schema_migrations";

/// Target database that object and migration scripts run against
///
/// Implementations must be Send + Sync so a backend can be shared by the
/// migration engine and the stepper.
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute one or more SQL statements inside a single transaction,
    /// rolling back everything if any statement fails
    fn execute_in_transaction(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Applied version as recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Last version a step targeted
    pub version: Version,

    /// Set while a step is in flight; left set if it failed
    pub dirty: bool,
}

/// Persistent record of the applied schema version
pub trait MigrationLedger: Send + Sync {
    /// Create the ledger table if it does not exist
    fn ensure_ledger(&self) -> DbResult<()>;

    /// Read the ledger; `None` when no version was ever applied
    fn read_version(&self) -> DbResult<Option<LedgerEntry>>;

    /// Replace the ledger contents; `None` clears it
    fn write_version(&self, entry: Option<LedgerEntry>) -> DbResult<()>;
}

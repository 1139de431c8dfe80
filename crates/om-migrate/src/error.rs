//! Error types for migration runs.

use crate::engine::Direction;
use om_core::{CoreError, Version};
use om_db::DbError;
use thiserror::Error;

/// Migration run errors. Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The ledger records an interrupted step (R001).
    #[error("[R001] Database is dirty at version {version}: a previous step failed midway, fix it manually before migrating")]
    DirtyLedger { version: Version },

    /// No migration file exists for the requested step (R002).
    #[error("[R002] No {direction} migration available from version {from}")]
    NoMigration { from: Version, direction: Direction },

    /// The migration has no down file (R003).
    #[error("[R003] Migration {version} has no down file")]
    MissingDownMigration { version: Version },

    /// Executing a schema migration failed (R004).
    #[error("[R004] Migration {direction} to version {version} failed")]
    StepFailed {
        version: Version,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Dropping or creating objects failed (R005).
    #[error("[R005] Object scripts failed at version {version}")]
    ObjectPhaseFailed {
        version: Version,
        #[source]
        source: DbError,
    },

    /// The engine reported a version other than the next one (R006).
    #[error("[R006] Expected version {expected} after step, engine reported {actual}")]
    UnexpectedVersion { expected: Version, actual: Version },

    /// Objects define revisions past the last migration file (R007).
    #[error("[R007] Cannot migrate up to version {target}: the last migration is {last_migration}, add migrations up to {target} or remove the newer object revisions")]
    TargetBeyondMigrations {
        target: Version,
        last_migration: Version,
    },

    /// Object or migration file error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error outside a step (ledger access).
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

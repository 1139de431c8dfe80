//! Schema-migration engine.
//!
//! [`MigrationEngine`] is the seam the stepper drives: report the applied
//! version, and move it by exactly one step. [`FileMigrator`] implements it
//! over a [`MigrationSource`] and a database that keeps the
//! `schema_migrations` ledger. A step marks the ledger dirty, runs the script
//! in a transaction, then clears the flag; a failed script leaves the ledger
//! dirty for manual repair.

use crate::error::{MigrateError, MigrateResult};
use om_core::{MigrationSource, Version};
use om_db::{Database, LedgerEntry, MigrationLedger};

/// Direction of a migration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Version one step from `version` in this direction, `None` below zero
    pub fn next(self, version: Version) -> Option<Version> {
        match self {
            Direction::Up => version.checked_add(1),
            Direction::Down => version.checked_sub(1),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Versioned schema-migration engine
pub trait MigrationEngine {
    /// Applied version (`0` when nothing was applied) and dirty flag
    fn version(&self) -> MigrateResult<LedgerEntry>;

    /// Apply exactly one step and return the new version
    fn step(&mut self, direction: Direction) -> MigrateResult<Version>;

    /// Highest version the engine can migrate to
    fn highest_version(&self) -> Version;
}

/// File-based engine recording progress in the database ledger
pub struct FileMigrator<'a, D: ?Sized> {
    db: &'a D,
    source: MigrationSource,
}

impl<'a, D> FileMigrator<'a, D>
where
    D: Database + MigrationLedger + ?Sized,
{
    /// Create an engine over `source`, creating the ledger table if needed.
    pub fn new(db: &'a D, source: MigrationSource) -> MigrateResult<Self> {
        db.ensure_ledger()?;
        Ok(Self { db, source })
    }

    /// Migration files known to the engine
    pub fn source(&self) -> &MigrationSource {
        &self.source
    }

    fn run_script(
        &self,
        script: &str,
        target: Version,
        direction: Direction,
    ) -> MigrateResult<()> {
        self.db.write_version(Some(LedgerEntry {
            version: target,
            dirty: true,
        }))?;

        self.db
            .execute_in_transaction(script)
            .map_err(|source| MigrateError::StepFailed {
                version: target,
                direction,
                source,
            })?;

        let clean = (target > 0).then_some(LedgerEntry {
            version: target,
            dirty: false,
        });
        self.db.write_version(clean)?;
        Ok(())
    }
}

impl<D> MigrationEngine for FileMigrator<'_, D>
where
    D: Database + MigrationLedger + ?Sized,
{
    fn version(&self) -> MigrateResult<LedgerEntry> {
        Ok(self.db.read_version()?.unwrap_or(LedgerEntry {
            version: 0,
            dirty: false,
        }))
    }

    fn step(&mut self, direction: Direction) -> MigrateResult<Version> {
        let current = self.version()?;
        if current.dirty {
            return Err(MigrateError::DirtyLedger {
                version: current.version,
            });
        }
        let no_migration = || MigrateError::NoMigration {
            from: current.version,
            direction,
        };

        let target = direction.next(current.version).ok_or_else(no_migration)?;
        match direction {
            Direction::Up => {
                let file = self.source.get(target).ok_or_else(no_migration)?;
                let script = file.read_up()?;
                log::debug!("Applying {} ({})", file.up_path.display(), file.title);
                self.run_script(&script, target, direction)?;
            }
            Direction::Down => {
                let file = self.source.get(current.version).ok_or_else(no_migration)?;
                let script = file
                    .read_down()?
                    .ok_or(MigrateError::MissingDownMigration {
                        version: current.version,
                    })?;
                log::debug!("Reverting version {} ({})", current.version, file.title);
                self.run_script(&script, target, direction)?;
            }
        }
        Ok(target)
    }

    fn highest_version(&self) -> Version {
        self.source.highest_version()
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

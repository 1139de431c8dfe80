//! Run planning: from a requested step count to a target version.

use crate::engine::Direction;
use crate::error::{MigrateError, MigrateResult};
use om_core::Version;

/// Requested movement, as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steps {
    /// Move up `n` versions; `0` means "to the highest available version"
    Up(u64),
    /// Move down `n` versions; `0` means "reset to version 0"
    Down(u64),
}

/// Start and target of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub start: Version,
    pub target: Version,
}

impl RunPlan {
    /// Direction of travel, `None` when there is nothing to do
    pub fn direction(&self) -> Option<Direction> {
        match self.target.cmp(&self.start) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Number of single-version steps the run takes
    pub fn step_count(&self) -> u64 {
        self.start.abs_diff(self.target)
    }

    /// Whether the run moves at all
    pub fn is_noop(&self) -> bool {
        self.start == self.target
    }
}

/// Compute the target version for `requested` starting at `current`.
///
/// The target is clamped to `[0, highest]`. An up request never moves the
/// schema down, even when `current` is already above `highest`.
pub fn plan_run(current: Version, requested: Steps, highest: Version) -> RunPlan {
    let target = match requested {
        Steps::Up(0) => highest.max(current),
        Steps::Up(n) => current.saturating_add(n).min(highest).max(current),
        Steps::Down(0) => 0,
        Steps::Down(n) => current.saturating_sub(n),
    };
    RunPlan {
        start: current,
        target,
    }
}

/// Refuse an up run whose target lies past the last migration file.
///
/// Checked before anything is dropped, so an unreachable target leaves the
/// database untouched.
pub fn check_reachable(plan: RunPlan, last_migration: Version) -> MigrateResult<()> {
    if plan.direction() == Some(Direction::Up) && plan.target > last_migration {
        return Err(MigrateError::TargetBeyondMigrations {
            target: plan.target,
            last_migration,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;

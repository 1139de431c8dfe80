//! om-migrate - Object-aware schema migrations for objmigrate
//!
//! Provides the file-based migration engine that keeps the
//! `schema_migrations` ledger, run planning, and the stepper that drops and
//! recreates database objects around every schema step.

pub mod engine;
pub mod error;
pub mod plan;
pub mod stepper;

pub use engine::{Direction, FileMigrator, MigrationEngine};
pub use error::{MigrateError, MigrateResult};
pub use plan::{check_reachable, plan_run, RunPlan, Steps};
pub use stepper::{
    plan_object_actions, preview_run, refresh_actions, ObjectActions, RunReport, RunState,
    StepReport, Stepper,
};

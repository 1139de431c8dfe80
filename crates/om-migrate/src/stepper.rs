//! Migration stepper.
//!
//! Drives a [`MigrationEngine`] one version at a time and keeps database
//! objects in line with the schema. Every object is dropped before the first
//! step. After each step the objects whose definition changes are dropped and
//! recreated together with everything that depends on them (every object of
//! higher priority that is live). After the last step every object is brought
//! to the revision in force at the target version.

use crate::engine::{Direction, MigrationEngine};
use crate::error::{MigrateError, MigrateResult};
use crate::plan::{check_reachable, plan_run, RunPlan, Steps};
use om_core::{drop_script, DatabaseObject, ObjectCatalog, ObjectName, Version};
use om_db::Database;
use std::collections::BTreeMap;

/// State threaded through the stepping loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Version the schema is at
    pub current_version: Version,

    /// Version the run stops at
    pub final_version: Version,

    /// Set until the first step has dropped every object
    pub drop: bool,

    /// Objects created by this run, with their revision
    pub live: BTreeMap<ObjectName, Version>,
}

impl RunState {
    /// Fresh state for `plan`
    pub fn new(plan: RunPlan) -> Self {
        Self {
            current_version: plan.start,
            final_version: plan.target,
            drop: true,
            live: BTreeMap::new(),
        }
    }

    /// Whether the run has reached its target
    pub fn is_done(&self) -> bool {
        self.current_version == self.final_version
    }
}

/// Objects to drop and create after one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectActions {
    /// Names to drop, in drop order
    pub dropped: Vec<ObjectName>,

    /// Names and revisions to create, in creation order
    pub created: Vec<(ObjectName, Version)>,
}

impl ObjectActions {
    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty() && self.created.is_empty()
    }

    /// Apply the actions to a live set
    fn apply_to(&self, live: &mut BTreeMap<ObjectName, Version>) {
        for name in &self.dropped {
            live.remove(name);
        }
        for (name, revision) in &self.created {
            live.insert(name.clone(), *revision);
        }
    }
}

/// What happened in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub from: Version,
    pub to: Version,
    pub actions: ObjectActions,
}

/// What happened in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub plan: RunPlan,

    /// Objects dropped before the first step, in drop order
    pub dropped_first: Vec<ObjectName>,

    pub steps: Vec<StepReport>,
}

impl RunReport {
    fn new(plan: RunPlan) -> Self {
        Self {
            plan,
            dropped_first: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Compute the object actions after stepping from `from` to `to`.
///
/// `live` holds the objects created earlier in the run. On an intermediate
/// step only objects defining a revision at the version being crossed are
/// considered changed, and the set in scope is every object up to the highest
/// changed priority. On the last step every object is in scope.
pub fn plan_object_actions(
    catalog: &ObjectCatalog,
    live: &BTreeMap<ObjectName, Version>,
    from: Version,
    to: Version,
    is_last: bool,
) -> ObjectActions {
    let objects: Vec<&DatabaseObject> = catalog.creation_order().collect();

    let scope = if is_last {
        objects.len()
    } else {
        let crossed = from.max(to);
        let Some(max_priority) = objects
            .iter()
            .filter(|object| object.has_revision(crossed))
            .map(|object| object.priority)
            .max()
        else {
            return ObjectActions::default();
        };
        objects
            .iter()
            .take_while(|object| object.priority <= max_priority)
            .count()
    };

    let live_revision = |object: &DatabaseObject| live.get(&object.name).copied();
    let Some(first) = objects[..scope]
        .iter()
        .position(|object| live_revision(object) != object.revision_in_force(to))
    else {
        return ObjectActions::default();
    };

    let dropped = objects[first..]
        .iter()
        .rev()
        .filter(|object| live_revision(object).is_some())
        .map(|object| object.name.clone())
        .collect();

    let created = objects[first..]
        .iter()
        .enumerate()
        .filter(|(offset, object)| first + offset < scope || live_revision(object).is_some())
        .filter_map(|(_, object)| {
            object
                .revision_in_force(to)
                .map(|revision| (object.name.clone(), revision))
        })
        .collect();

    ObjectActions { dropped, created }
}

/// Simulate a run without touching the database.
///
/// `last_migration` is the highest migration file version; the plan is
/// checked against it the same way [`Stepper::run`] does.
pub fn preview_run(
    catalog: &ObjectCatalog,
    current: Version,
    requested: Steps,
    last_migration: Version,
) -> MigrateResult<RunReport> {
    let highest = catalog.highest_available_version().max(last_migration);
    let plan = plan_run(current, requested, highest);
    check_reachable(plan, last_migration)?;

    let mut report = RunReport::new(plan);
    let Some(direction) = plan.direction() else {
        return Ok(report);
    };

    let mut state = RunState::new(plan);
    while !state.is_done() {
        if state.drop {
            report.dropped_first = drop_names(catalog);
            state.drop = false;
        }
        let from = state.current_version;
        let Some(to) = direction.next(from) else {
            break;
        };
        let actions =
            plan_object_actions(catalog, &state.live, from, to, to == state.final_version);
        actions.apply_to(&mut state.live);
        report.steps.push(StepReport { from, to, actions });
        state.current_version = to;
    }
    Ok(report)
}

/// Drop every object, then create the ones in force at `version`.
pub fn refresh_actions(catalog: &ObjectCatalog, version: Version) -> ObjectActions {
    ObjectActions {
        dropped: drop_names(catalog),
        created: catalog
            .creation_order()
            .filter_map(|object| {
                object
                    .revision_in_force(version)
                    .map(|revision| (object.name.clone(), revision))
            })
            .collect(),
    }
}

fn drop_names(catalog: &ObjectCatalog) -> Vec<ObjectName> {
    catalog.drop_order().map(|object| object.name.clone()).collect()
}

/// Orchestrates engine steps and object scripts
pub struct Stepper<'a, E: ?Sized, D: ?Sized> {
    engine: &'a mut E,
    db: &'a D,
    catalog: &'a ObjectCatalog,
}

impl<'a, E, D> Stepper<'a, E, D>
where
    E: MigrationEngine + ?Sized,
    D: Database + ?Sized,
{
    pub fn new(engine: &'a mut E, db: &'a D, catalog: &'a ObjectCatalog) -> Self {
        Self {
            engine,
            db,
            catalog,
        }
    }

    /// Highest version reachable: the greater of object revisions and
    /// migration files.
    pub fn highest_version(&self) -> Version {
        self.catalog
            .highest_available_version()
            .max(self.engine.highest_version())
    }

    /// Applied version, refusing a dirty ledger
    pub fn current_version(&self) -> MigrateResult<Version> {
        let entry = self.engine.version()?;
        if entry.dirty {
            return Err(MigrateError::DirtyLedger {
                version: entry.version,
            });
        }
        Ok(entry.version)
    }

    /// Plan a run from the applied version, refusing a target no migration
    /// file reaches
    pub fn plan(&self, requested: Steps) -> MigrateResult<RunPlan> {
        let plan = plan_run(
            self.current_version()?,
            requested,
            self.highest_version(),
        );
        check_reachable(plan, self.engine.highest_version())?;
        Ok(plan)
    }

    /// Migrate as requested, stopping at the first error.
    pub fn run(&mut self, requested: Steps) -> MigrateResult<RunReport> {
        let plan = self.plan(requested)?;
        let mut report = RunReport::new(plan);
        let Some(direction) = plan.direction() else {
            log::info!("Already at version {}, nothing to do", plan.start);
            return Ok(report);
        };

        log::info!(
            "Migrating {direction} from version {} to {} ({} step(s))",
            plan.start,
            plan.target,
            plan.step_count()
        );

        let mut state = RunState::new(plan);
        while !state.is_done() {
            let from = state.current_version;

            if state.drop {
                log::info!("Dropping {} object(s)", self.catalog.len());
                self.db
                    .execute_in_transaction(&drop_script(self.catalog))
                    .map_err(|source| MigrateError::ObjectPhaseFailed {
                        version: from,
                        source,
                    })?;
                report.dropped_first = drop_names(self.catalog);
            }

            let to = self.engine.step(direction)?;
            let expected = direction.next(from);
            if expected != Some(to) {
                return Err(MigrateError::UnexpectedVersion {
                    expected: expected.unwrap_or(from),
                    actual: to,
                });
            }
            log::info!("Migrated {direction} to version {to}");

            let actions = plan_object_actions(
                self.catalog,
                &state.live,
                from,
                to,
                to == state.final_version,
            );
            self.apply_actions(&actions, to)?;
            actions.apply_to(&mut state.live);

            state.drop = false;
            state.current_version = to;
            report.steps.push(StepReport { from, to, actions });
        }

        log::info!("Schema is at version {}", state.current_version);
        Ok(report)
    }

    /// Drop every object and recreate the ones in force at the applied
    /// version, without stepping.
    pub fn refresh(&mut self) -> MigrateResult<ObjectActions> {
        let version = self.current_version()?;
        let actions = refresh_actions(self.catalog, version);
        log::info!(
            "Refreshing {} object(s) at version {version}",
            actions.created.len()
        );
        self.apply_actions(&actions, version)?;
        Ok(actions)
    }

    /// Run the drops and creates of `actions` in one transaction.
    fn apply_actions(&self, actions: &ObjectActions, version: Version) -> MigrateResult<()> {
        if actions.is_empty() {
            return Ok(());
        }

        let mut script = String::new();
        for name in &actions.dropped {
            if let Some(object) = self.catalog.get(name) {
                log::debug!("Dropping {name}");
                script.push_str(&object.drop_sql());
                script.push('\n');
            }
        }
        for (name, revision) in &actions.created {
            let Some(definition) = self
                .catalog
                .get(name)
                .and_then(|object| object.revision(*revision))
            else {
                continue;
            };
            log::debug!("Creating {name} at revision {revision}");
            script.push_str(&definition.create_sql()?);
            script.push('\n');
        }

        self.db
            .execute_in_transaction(&script)
            .map_err(|source| MigrateError::ObjectPhaseFailed { version, source })
    }
}

#[cfg(test)]
#[path = "stepper_test.rs"]
mod tests;

//! Database object definitions
//!
//! A database object (view, macro, function, procedure) lives in its own
//! directory named `<padded priority>_<name>` and is redefined by revision
//! files inside it. The priority orders creation (ascending) and drops
//! (descending) so that objects depending on each other can be rebuilt.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::object_name::ObjectName;
use crate::pad::lpad;
use crate::resolver::ResolutionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Schema-migration version, and the revision number objects are tagged with
pub type Version = u64;

/// Kind of database object, which decides how it is dropped
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Plain view
    #[default]
    View,
    /// Scalar macro (DuckDB)
    Macro,
    /// Table macro (DuckDB)
    TableMacro,
    /// Stored function
    Function,
    /// Stored procedure.
    ///
    /// DuckDB has no procedures and rejects the generated
    /// `DROP PROCEDURE`; set `drop` in the metadata file when using this kind.
    Procedure,
}

impl ObjectKind {
    /// Generate the `DROP ... IF EXISTS` statement for an object of this kind.
    pub fn drop_sql(self, name: &ObjectName) -> String {
        match self {
            ObjectKind::View => format!("DROP VIEW IF EXISTS {name};"),
            ObjectKind::Macro => format!("DROP MACRO IF EXISTS {name};"),
            ObjectKind::TableMacro => format!("DROP MACRO TABLE IF EXISTS {name};"),
            ObjectKind::Function => format!("DROP FUNCTION IF EXISTS {name};"),
            ObjectKind::Procedure => format!("DROP PROCEDURE IF EXISTS {name};"),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::View => write!(f, "view"),
            ObjectKind::Macro => write!(f, "macro"),
            ObjectKind::TableMacro => write!(f, "table_macro"),
            ObjectKind::Function => write!(f, "function"),
            ObjectKind::Procedure => write!(f, "procedure"),
        }
    }
}

/// YAML schema of the optional `<padded priority>_<name>.yml` metadata file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectMeta {
    /// Object kind (default: view)
    #[serde(default)]
    pub kind: ObjectKind,

    /// Description of the object
    #[serde(default)]
    pub description: Option<String>,

    /// Explicit drop statement, for kinds whose drop needs a signature
    #[serde(default)]
    pub drop: Option<String>,
}

impl ObjectMeta {
    /// Load object metadata from a YAML file path.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::ObjectMetaParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }
}

/// A tracked database object and every revision discovered for it
#[derive(Debug, Clone)]
pub struct DatabaseObject {
    /// Object name, unique within an object directory
    pub name: ObjectName,

    /// Creation priority (ascending creates, descending drops)
    pub priority: u64,

    /// Object kind
    pub kind: ObjectKind,

    /// Description from the metadata file
    pub description: Option<String>,

    /// Drop statement override from the metadata file
    pub drop_override: Option<String>,

    /// Revision number to the file defining it
    revisions: BTreeMap<Version, PathBuf>,
}

impl DatabaseObject {
    /// Create an object with no revisions yet
    pub fn new(name: ObjectName, priority: u64, kind: ObjectKind) -> Self {
        Self {
            name,
            priority,
            kind,
            description: None,
            drop_override: None,
            revisions: BTreeMap::new(),
        }
    }

    /// Apply metadata read from the object's YAML file
    pub fn with_meta(mut self, meta: ObjectMeta) -> Self {
        self.kind = meta.kind;
        self.description = meta.description;
        self.drop_override = meta.drop;
        self
    }

    /// Record a revision file.
    ///
    /// Returns the previously recorded path if `revision` was already known,
    /// leaving the existing entry in place.
    pub fn add_revision(&mut self, revision: Version, path: PathBuf) -> Result<(), PathBuf> {
        match self.revisions.get(&revision) {
            Some(existing) => Err(existing.clone()),
            None => {
                self.revisions.insert(revision, path);
                Ok(())
            }
        }
    }

    /// Directory name `<padded priority>_<name>`
    pub fn dir_name(&self, priority_pad: usize) -> String {
        format!("{}_{}", lpad(self.priority, priority_pad), self.name)
    }

    /// Canonical identity path of the object:
    /// `<objects>/<padded priority>_<name>/<padded priority>_<name>.sql`.
    ///
    /// The revision is not part of the identity; revision files are owned by
    /// the directory scan and reached through [`Self::file_name_for_revision`].
    pub fn file_name(&self, config: &Config) -> PathBuf {
        let dir_name = self.dir_name(config.priority_pad);
        config
            .objects_path
            .join(&dir_name)
            .join(format!("{dir_name}.sql"))
    }

    /// Path of the optional metadata file next to the identity path
    pub fn meta_file_name(&self, config: &Config) -> PathBuf {
        self.file_name(config).with_extension("yml")
    }

    /// Every revision number, ascending
    pub fn revisions(&self) -> impl Iterator<Item = Version> + '_ {
        self.revisions.keys().copied()
    }

    /// Number of known revisions
    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }

    /// Whether `revision` is defined for this object
    pub fn has_revision(&self, revision: Version) -> bool {
        self.revisions.contains_key(&revision)
    }

    /// File defining `revision`, if known
    pub fn file_name_for_revision(&self, revision: Version) -> Option<&Path> {
        self.revisions.get(&revision).map(PathBuf::as_path)
    }

    /// File selected for migration step `step` under `policy`, or `None` when
    /// the object has no applicable revision at this step.
    pub fn file_name_for_step(&self, step: Version, policy: ResolutionPolicy) -> Option<&Path> {
        policy
            .select(self.revisions(), step)
            .and_then(|revision| self.file_name_for_revision(revision))
    }

    /// Greatest revision `<= version`: the definition live once the schema
    /// is at `version`.
    pub fn revision_in_force(&self, version: Version) -> Option<Version> {
        self.revisions
            .range(..=version)
            .next_back()
            .map(|(revision, _)| *revision)
    }

    /// Highest revision ever defined
    pub fn current_revision(&self) -> Option<Version> {
        self.revisions.keys().next_back().copied()
    }

    /// Pair this object with one of its revisions
    pub fn revision(&self, revision: Version) -> Option<ObjectRevision<'_>> {
        self.revisions
            .get_key_value(&revision)
            .map(|(revision, path)| ObjectRevision {
                object: self,
                revision: *revision,
                path,
            })
    }

    /// Drop statement: the metadata override or the kind's default
    pub fn drop_sql(&self) -> String {
        match &self.drop_override {
            Some(sql) => terminate_statement(sql),
            None => self.kind.drop_sql(&self.name),
        }
    }
}

/// A resolved (object, revision) pair
#[derive(Debug, Clone, Copy)]
pub struct ObjectRevision<'a> {
    /// The object
    pub object: &'a DatabaseObject,

    /// Resolved revision number
    pub revision: Version,

    /// File defining the revision
    pub path: &'a Path,
}

impl ObjectRevision<'_> {
    /// Read the revision's SQL as a single terminated create script.
    pub fn create_sql(&self) -> CoreResult<String> {
        let sql = std::fs::read_to_string(self.path).map_err(|e| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if sql.trim().is_empty() {
            return Err(CoreError::EmptyRevision {
                name: self.object.name.to_string(),
                revision: self.revision,
                path: self.path.display().to_string(),
            });
        }

        Ok(terminate_statement(&sql))
    }
}

/// Trim surrounding whitespace and make sure the script ends with `;`
fn terminate_statement(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.ends_with(';') {
        return trimmed.to_string();
    }
    // A trailing line comment would swallow an appended terminator.
    let last_line = trimmed.lines().next_back().unwrap_or_default();
    if last_line.contains("--") {
        format!("{trimmed}\n;")
    } else {
        format!("{trimmed};")
    }
}

#[cfg(test)]
#[path = "object_test.rs"]
mod tests;

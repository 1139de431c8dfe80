//! Schema-migration file discovery
//!
//! Migration files follow the `<version>_<title>.up.sql` /
//! `<version>_<title>.down.sql` convention. Versions must run contiguously
//! from 1 so that one step always moves the schema by exactly one version.

use crate::catalog::{parse_numbered, read_dir_sorted};
use crate::error::{CoreError, CoreResult};
use crate::object::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Direction of a migration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileDirection {
    Up,
    Down,
}

/// One schema migration and its up/down files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Version the migration moves the schema to
    pub version: Version,

    /// Title part of the file name
    pub title: String,

    /// Forward script
    pub up_path: PathBuf,

    /// Backward script, when one exists
    pub down_path: Option<PathBuf>,
}

impl MigrationFile {
    /// Read the forward script
    pub fn read_up(&self) -> CoreResult<String> {
        read_script(&self.up_path)
    }

    /// Read the backward script, `None` when the migration has no down file
    pub fn read_down(&self) -> CoreResult<Option<String>> {
        self.down_path.as_deref().map(read_script).transpose()
    }
}

fn read_script(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// All schema migrations found in a migrations directory, keyed by version
#[derive(Debug, Clone, Default)]
pub struct MigrationSource {
    migrations: BTreeMap<Version, MigrationFile>,
}

impl MigrationSource {
    /// Scan `dir` for migration files.
    pub fn scan(dir: &Path) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut ups: BTreeMap<Version, (String, PathBuf)> = BTreeMap::new();
        let mut downs: BTreeMap<Version, PathBuf> = BTreeMap::new();

        for path in read_dir_sorted(dir)? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((version, title, direction)) = parse_migration_file_name(file_name) else {
                log::warn!("Skipping unexpected file in migrations path: {}", path.display());
                continue;
            };

            let existing = match direction {
                FileDirection::Up => ups
                    .insert(version, (title.to_string(), path.clone()))
                    .map(|(_, p)| p),
                FileDirection::Down => downs.insert(version, path.clone()),
            };
            if let Some(existing) = existing {
                return Err(CoreError::DuplicateMigration {
                    version,
                    path1: existing.display().to_string(),
                    path2: path.display().to_string(),
                });
            }
        }

        if let Some((version, path)) = downs.iter().find(|(v, _)| !ups.contains_key(v)) {
            return Err(CoreError::MissingUpMigration {
                version: *version,
                path: path.display().to_string(),
            });
        }

        for (expected, found) in (1..).zip(ups.keys()) {
            if expected != *found {
                return Err(CoreError::MigrationGap {
                    expected,
                    found: *found,
                });
            }
        }

        let migrations = ups
            .into_iter()
            .map(|(version, (title, up_path))| {
                let down_path = downs.remove(&version);
                let file = MigrationFile {
                    version,
                    title,
                    up_path,
                    down_path,
                };
                (version, file)
            })
            .collect();

        Ok(Self { migrations })
    }

    /// Look up a migration by version
    pub fn get(&self, version: Version) -> Option<&MigrationFile> {
        self.migrations.get(&version)
    }

    /// Highest migration version, `0` when there are none
    pub fn highest_version(&self) -> Version {
        self.migrations.keys().next_back().copied().unwrap_or(0)
    }

    /// All migrations by ascending version
    pub fn iter(&self) -> impl Iterator<Item = &MigrationFile> + '_ {
        self.migrations.values()
    }

    /// Number of migrations
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Whether the directory held no migrations
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

/// Parse `<version>[_<title>].(up|down).sql`
fn parse_migration_file_name(file_name: &str) -> Option<(Version, &str, FileDirection)> {
    let (stem, direction) = if let Some(stem) = file_name.strip_suffix(".up.sql") {
        (stem, FileDirection::Up)
    } else if let Some(stem) = file_name.strip_suffix(".down.sql") {
        (stem, FileDirection::Down)
    } else {
        return None;
    };
    let (version, title) = parse_numbered(stem)?;
    Some((version, title.unwrap_or_default(), direction))
}

#[cfg(test)]
#[path = "migration_source_test.rs"]
mod tests;

//! Object directory discovery
//!
//! Layout of the object directory:
//!
//! ```text
//! objects/
//!   001_active_users/
//!     001_active_users.yml    optional metadata (kind, description, drop)
//!     0002.sql                revision 2
//!     0004_add_email.sql      revision 4
//!   002_user_report/
//!     0003.sql
//! ```
//!
//! Directory and file names start with a decimal number; padding is
//! cosmetic and any width is accepted when reading.

use crate::error::{CoreError, CoreResult};
use crate::object::{DatabaseObject, ObjectKind, ObjectMeta, Version};
use crate::object_name::ObjectName;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Every object discovered in an object directory, sorted by priority then name
#[derive(Debug, Clone, Default)]
pub struct ObjectCatalog {
    objects: Vec<DatabaseObject>,
}

impl ObjectCatalog {
    /// Build a catalog from already-constructed objects
    pub fn from_objects(mut objects: Vec<DatabaseObject>) -> Self {
        objects.sort_by(|a, b| (a.priority, &a.name).cmp(&(b.priority, &b.name)));
        Self { objects }
    }

    /// Scan `dir` for object directories and their revision files.
    ///
    /// A missing directory is an error; an empty one yields an empty catalog.
    pub fn scan(dir: &Path) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut objects = Vec::new();
        let mut seen_names: HashMap<ObjectName, PathBuf> = HashMap::new();

        for path in read_dir_sorted(dir)? {
            if !path.is_dir() {
                log::warn!("Skipping non-directory entry in objects path: {}", path.display());
                continue;
            }
            let Some(object) = load_object_dir(&path)? else {
                continue;
            };
            if let Some(existing) = seen_names.get(&object.name) {
                return Err(CoreError::DuplicateObject {
                    name: object.name.to_string(),
                    path1: existing.display().to_string(),
                    path2: path.display().to_string(),
                });
            }
            seen_names.insert(object.name.clone(), path);
            objects.push(object);
        }

        log::debug!("Discovered {} objects in {}", objects.len(), dir.display());
        Ok(Self::from_objects(objects))
    }

    /// All objects in creation order
    pub fn objects(&self) -> &[DatabaseObject] {
        &self.objects
    }

    /// Number of tracked objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects were discovered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object by name
    pub fn get(&self, name: &str) -> Option<&DatabaseObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Objects by ascending priority
    pub fn creation_order(&self) -> impl DoubleEndedIterator<Item = &DatabaseObject> + '_ {
        self.objects.iter()
    }

    /// Objects by descending priority
    pub fn drop_order(&self) -> impl Iterator<Item = &DatabaseObject> + '_ {
        self.objects.iter().rev()
    }

    /// Highest revision across all objects, `0` when there are none.
    pub fn highest_available_version(&self) -> Version {
        self.objects
            .iter()
            .filter_map(DatabaseObject::current_revision)
            .max()
            .unwrap_or(0)
    }
}

/// Split `<digits>` or `<digits>_<rest>` into its number and optional rest.
pub(crate) fn parse_numbered(s: &str) -> Option<(u64, Option<&str>)> {
    let (digits, rest) = match s.split_once('_') {
        Some((digits, rest)) => (digits, Some(rest)),
        None => (s, None),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (n, rest))
}

/// Directory entries sorted by path, so discovery order is deterministic.
pub(crate) fn read_dir_sorted(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let io_err = |e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    };
    let mut paths = std::fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    paths.sort();
    Ok(paths)
}

/// Load one `<priority>_<name>` directory, or `None` if the name does not match.
fn load_object_dir(dir: &Path) -> CoreResult<Option<DatabaseObject>> {
    let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
        log::warn!("Skipping object directory with non UTF-8 name: {}", dir.display());
        return Ok(None);
    };
    let Some((priority, Some(raw_name))) = parse_numbered(dir_name) else {
        log::warn!(
            "Skipping directory '{}': expected <priority>_<name>",
            dir.display()
        );
        return Ok(None);
    };
    let name = ObjectName::try_new(raw_name).ok_or_else(|| CoreError::InvalidObjectName {
        name: raw_name.to_string(),
        path: dir.display().to_string(),
    })?;

    let mut object = DatabaseObject::new(name, priority, ObjectKind::default());

    for path in read_dir_sorted(dir)? {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, ext),
            None => (file_name, ""),
        };

        if stem == dir_name {
            match ext {
                "yml" | "yaml" => object = object.with_meta(ObjectMeta::load(&path)?),
                // identity file, not a revision
                "sql" => log::debug!("Ignoring identity file {}", path.display()),
                _ => log::warn!("Skipping unexpected file {}", path.display()),
            }
            continue;
        }

        let revision = match (ext, parse_numbered(stem)) {
            ("sql", Some((0, _))) => {
                log::warn!(
                    "Skipping {}: revision 0 is the empty schema and cannot define an object",
                    path.display()
                );
                continue;
            }
            ("sql", Some((revision, _))) => revision,
            _ => {
                log::warn!("Skipping unexpected file {}", path.display());
                continue;
            }
        };

        if let Err(existing) = object.add_revision(revision, path.clone()) {
            return Err(CoreError::DuplicateRevision {
                name: object.name.to_string(),
                revision,
                path1: existing.display().to_string(),
                path2: path.display().to_string(),
            });
        }
    }

    if object.revision_count() == 0 {
        return Err(CoreError::NoRevisions {
            name: object.name.to_string(),
            path: dir.display().to_string(),
        });
    }

    Ok(Some(object))
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

//! Configuration types and parsing for objmigrate.yml
//!
//! Configuration is layered: an optional YAML file supplies defaults and
//! command-line flags (or their environment variables) override it. Both
//! layers are represented by [`ConfigFile`]; [`ConfigFile::into_config`]
//! validates the merged result into an immutable [`Config`].

use crate::error::{CoreError, CoreResult};
use crate::resolver::ResolutionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default zero-padding width for object priorities
pub const DEFAULT_PRIORITY_PAD: usize = 3;

/// Default zero-padding width for revision numbers
pub const DEFAULT_VERSION_PAD: usize = 4;

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "objmigrate.yml";

/// Validated, immutable run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of schema-migration files
    pub migrations_path: PathBuf,

    /// Directory of versioned object definitions
    pub objects_path: PathBuf,

    /// Target database source (DuckDB path or `:memory:`)
    pub db_source: String,

    /// Destination of the generated create-sumfile
    pub create_filename: PathBuf,

    /// Destination of the generated drop-file
    pub drop_filename: PathBuf,

    /// Zero-padding width of object priorities in directory names
    pub priority_pad: usize,

    /// Zero-padding width of revision numbers in reports and sumfile headers
    pub version_pad: usize,

    /// Rule used by step-based file resolution (`--resolve`). Migration runs
    /// always create the revision in force at each version and ignore it.
    pub resolution_policy: ResolutionPolicy,
}

/// One configuration layer; every field is optional until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub migrations_path: Option<String>,

    #[serde(default)]
    pub objects_path: Option<String>,

    #[serde(default)]
    pub db_source: Option<String>,

    #[serde(default)]
    pub create_filename: Option<String>,

    #[serde(default)]
    pub drop_filename: Option<String>,

    #[serde(default)]
    pub priority_pad: Option<usize>,

    #[serde(default)]
    pub version_pad: Option<usize>,

    #[serde(default)]
    pub resolution_policy: Option<ResolutionPolicy>,
}

impl ConfigFile {
    /// Load a configuration layer from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    /// Load `objmigrate.yml` from `dir` if present, otherwise an empty layer
    pub fn load_from_dir_or_default(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            migrations_path: overrides.migrations_path.or(self.migrations_path),
            objects_path: overrides.objects_path.or(self.objects_path),
            db_source: overrides.db_source.or(self.db_source),
            create_filename: overrides.create_filename.or(self.create_filename),
            drop_filename: overrides.drop_filename.or(self.drop_filename),
            priority_pad: overrides.priority_pad.or(self.priority_pad),
            version_pad: overrides.version_pad.or(self.version_pad),
            resolution_policy: overrides.resolution_policy.or(self.resolution_policy),
        }
    }

    /// Validate the layer into a [`Config`].
    ///
    /// Every missing required value is reported in a single error.
    pub fn into_config(self) -> CoreResult<Config> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, flag: &'static str| match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                missing.push(flag);
                None
            }
        };

        let migrations_path = require(self.migrations_path, "migrations-path");
        let objects_path = require(self.objects_path, "objects-path");
        let db_source = require(self.db_source, "db-source");
        let create_filename = require(self.create_filename, "create-filename");
        let drop_filename = require(self.drop_filename, "drop-filename");

        match (
            migrations_path,
            objects_path,
            db_source,
            create_filename,
            drop_filename,
        ) {
            (Some(mp), Some(op), Some(db), Some(cf), Some(df)) => Ok(Config {
                migrations_path: PathBuf::from(strip_file_scheme(&mp)),
                objects_path: PathBuf::from(strip_file_scheme(&op)),
                db_source: db,
                create_filename: PathBuf::from(cf),
                drop_filename: PathBuf::from(df),
                priority_pad: self.priority_pad.unwrap_or(DEFAULT_PRIORITY_PAD),
                version_pad: self.version_pad.unwrap_or(DEFAULT_VERSION_PAD),
                resolution_policy: self.resolution_policy.unwrap_or_default(),
            }),
            _ => Err(CoreError::ConfigInvalid {
                message: format!("missing required value(s): {}", missing.join(", ")),
            }),
        }
    }
}

/// Strip a leading `file://` scheme from a path-like source URL
pub fn strip_file_scheme(source: &str) -> &str {
    source.strip_prefix("file://").unwrap_or(source)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! om-core - Core library for objmigrate
//!
//! This crate provides configuration, the database object model, object
//! directory scanning, revision resolution, migration-file discovery and
//! sumfile generation. It performs no database interaction.

pub mod catalog;
pub mod config;
pub mod error;
pub mod migration_source;
pub mod object;
pub mod object_name;
pub mod pad;
pub mod resolver;
pub mod sumfile;

pub use catalog::ObjectCatalog;
pub use config::{Config, ConfigFile};
pub use error::{CoreError, CoreResult};
pub use migration_source::{MigrationFile, MigrationSource};
pub use object::{DatabaseObject, ObjectKind, ObjectMeta, ObjectRevision, Version};
pub use object_name::ObjectName;
pub use pad::lpad;
pub use resolver::{ResolutionPolicy, ResolvedFile, Resolver};
pub use sumfile::{create_objects_file, drop_script, render_sumfiles, Sumfiles};

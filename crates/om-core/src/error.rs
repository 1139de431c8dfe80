//! Error types for om-core

use thiserror::Error;

/// Core error type for objmigrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {details}")]
    ConfigParseError { path: String, details: String },

    /// E003: Invalid or missing configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Directory not found
    #[error("[E004] Directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// E014: IO error with file path context
    #[error("[E014] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: Failed to write an output file
    #[error("[E015] Failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },

    // Object layout errors (OBJ001-OBJ006)
    /// OBJ001: Two object directories declare the same name
    #[error("[OBJ001] Duplicate object name '{name}' in {path1} and {path2}")]
    DuplicateObject {
        name: String,
        path1: String,
        path2: String,
    },

    /// OBJ002: Two files in one object directory declare the same revision
    #[error("[OBJ002] Object '{name}' defines revision {revision} twice: {path1} and {path2}")]
    DuplicateRevision {
        name: String,
        revision: u64,
        path1: String,
        path2: String,
    },

    /// OBJ003: Object directory has no revision files
    #[error("[OBJ003] Object '{name}' has no revision files in {path}")]
    NoRevisions { name: String, path: String },

    /// OBJ004: Object name is not a valid SQL identifier
    #[error("[OBJ004] Invalid object name '{name}' in {path}: must be a SQL identifier, optionally schema-qualified")]
    InvalidObjectName { name: String, path: String },

    /// OBJ005: Failed to parse object metadata YAML
    #[error("[OBJ005] Failed to parse object metadata {path}: {details}")]
    ObjectMetaParseError { path: String, details: String },

    /// OBJ006: Revision file is empty
    #[error("[OBJ006] Revision {revision} of object '{name}' is empty: {path}")]
    EmptyRevision {
        name: String,
        revision: u64,
        path: String,
    },

    // Migration file layout errors (MIG001-MIG003)
    /// MIG001: Two migration files declare the same version and direction
    #[error("[MIG001] Duplicate migration version {version}: {path1} and {path2}")]
    DuplicateMigration {
        version: u64,
        path1: String,
        path2: String,
    },

    /// MIG002: Migration versions are not contiguous
    #[error("[MIG002] Migration versions must be contiguous from 1: expected {expected}, found {found}")]
    MigrationGap { expected: u64, found: u64 },

    /// MIG003: A down migration has no matching up migration
    #[error("[MIG003] Migration {version} has a down file but no up file: {path}")]
    MissingUpMigration { version: u64, path: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

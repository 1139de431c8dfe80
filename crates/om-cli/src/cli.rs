//! CLI argument definitions using clap derive API

use clap::{Parser, ValueEnum};
use om_core::{ConfigFile, ResolutionPolicy};
use std::path::PathBuf;

/// objmigrate - schema migrations that keep versioned database objects in step
///
/// Every option can also be set through the environment variable shown in
/// its help, or through `objmigrate.yml` in the working directory.
#[derive(Parser, Debug)]
#[command(name = "om")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of schema-migration files (`file://` prefix accepted)
    #[arg(long, env = "OM_MIGRATIONS_PATH", value_name = "DIR")]
    pub migrations_path: Option<String>,

    /// Directory of versioned object definitions (`file://` prefix accepted)
    #[arg(long, env = "OM_OBJECTS_PATH", value_name = "DIR")]
    pub objects_path: Option<String>,

    /// Target DuckDB database path, or `:memory:`
    #[arg(long, env = "OM_DB_SOURCE", value_name = "SOURCE")]
    pub db_source: Option<String>,

    /// Destination of the create-sumfile
    #[arg(long, env = "OM_CREATE_FILENAME", value_name = "FILE")]
    pub create_filename: Option<String>,

    /// Destination of the drop-file
    #[arg(long, env = "OM_DROP_FILENAME", value_name = "FILE")]
    pub drop_filename: Option<String>,

    /// Write the create-sumfile and drop-file, then exit
    #[arg(long, env = "OM_SUMFILE", conflicts_with_all = ["up", "down", "refresh", "resolve"])]
    pub sumfile: bool,

    /// Migrate up
    #[arg(long, env = "OM_UP", conflicts_with = "down")]
    pub up: bool,

    /// Migrate down
    #[arg(long, env = "OM_DOWN")]
    pub down: bool,

    /// Number of steps; 0 with --up migrates to latest, 0 with --down resets
    #[arg(long, env = "OM_STEP", allow_negative_numbers = true, value_name = "N")]
    pub step: Option<i64>,

    /// Skip the confirmation asked before a reset
    #[arg(short, long, env = "OM_YES")]
    pub yes: bool,

    /// Drop and recreate every object at the current version
    #[arg(long, conflicts_with_all = ["up", "down", "resolve"])]
    pub refresh: bool,

    /// Print the file each object resolves to at step N, then exit
    #[arg(long, value_name = "N", conflicts_with_all = ["up", "down"])]
    pub resolve: Option<u64>,

    /// Print the migration plan without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Revision selection rule for --resolve; has no effect on --up, --down or --refresh
    #[arg(long, env = "OM_RESOLUTION_POLICY", value_enum)]
    pub resolution_policy: Option<PolicyArg>,

    /// Report format for --resolve and --dry-run
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Configuration file (default: objmigrate.yml in the working directory)
    #[arg(short, long, env = "OM_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The configuration layer given on the command line
    pub fn config_overrides(&self) -> ConfigFile {
        ConfigFile {
            migrations_path: self.migrations_path.clone(),
            objects_path: self.objects_path.clone(),
            db_source: self.db_source.clone(),
            create_filename: self.create_filename.clone(),
            drop_filename: self.drop_filename.clone(),
            priority_pad: None,
            version_pad: None,
            resolution_policy: self.resolution_policy.map(ResolutionPolicy::from),
        }
    }
}

/// Revision selection rules
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Furthest revision at or above the step
    LookAhead,
    /// Closest revision at or above the step
    Nearest,
}

impl From<PolicyArg> for ResolutionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::LookAhead => ResolutionPolicy::LookAhead,
            PolicyArg::Nearest => ResolutionPolicy::Nearest,
        }
    }
}

/// Report formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use om_core::{lpad, Config, ConfigFile, MigrationSource, ObjectCatalog, Version};
use om_db::{Database, DuckDbBackend, MigrationLedger, LEDGER_TABLE};
use om_migrate::{MigrateError, ObjectActions, RunReport, Steps};
use serde::Serialize;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::{Cli, OutputFormat};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs prints nothing for it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Build the run configuration: config file first, flags and environment on top.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => ConfigFile::load_from_dir_or_default(Path::new("."))
            .context("Failed to load objmigrate.yml")?,
    };

    let config = file
        .merge(cli.config_overrides())
        .into_config()
        .context("Invalid configuration")?;
    log::debug!("Configuration: {config:?}");
    Ok(config)
}

/// Scan the objects directory
pub(crate) fn load_catalog(config: &Config) -> Result<ObjectCatalog> {
    let catalog = ObjectCatalog::scan(&config.objects_path).with_context(|| {
        format!(
            "Failed to scan objects directory {}",
            config.objects_path.display()
        )
    })?;
    log::debug!("Found {} object(s)", catalog.len());
    Ok(catalog)
}

/// Scan the migrations directory
pub(crate) fn load_migrations(config: &Config) -> Result<MigrationSource> {
    let source = MigrationSource::scan(&config.migrations_path).with_context(|| {
        format!(
            "Failed to scan migrations directory {}",
            config.migrations_path.display()
        )
    })?;
    log::debug!("Found {} migration(s)", source.len());
    Ok(source)
}

/// Open the target database
pub(crate) fn connect(config: &Config) -> Result<DuckDbBackend> {
    DuckDbBackend::new(&config.db_source)
        .with_context(|| format!("Failed to connect to database {}", config.db_source))
}

/// Applied version without creating the ledger, refusing a dirty ledger
pub(crate) fn ledger_version(db: &DuckDbBackend) -> Result<Version> {
    if !db.relation_exists(LEDGER_TABLE)? {
        return Ok(0);
    }
    match db.read_version()? {
        None => Ok(0),
        Some(entry) if entry.dirty => Err(MigrateError::DirtyLedger {
            version: entry.version,
        }
        .into()),
        Some(entry) => Ok(entry.version),
    }
}

/// Applied version for a dry run.
///
/// A database file that does not exist yet is at version 0 and is not
/// created; the ledger is only read.
pub(crate) fn peek_version(config: &Config) -> Result<Version> {
    let path = config
        .db_source
        .strip_prefix("duckdb://")
        .unwrap_or(&config.db_source);
    if path == ":memory:" || !Path::new(path).exists() {
        log::debug!("No database at {path}, assuming version 0");
        return Ok(0);
    }
    ledger_version(&connect(config)?)
}

/// Translate `--up`/`--down`/`--step` into a step request.
pub(crate) fn requested_steps(cli: &Cli) -> Result<Steps> {
    if !cli.up && !cli.down {
        bail!("Nothing to do: pass one of --up, --down, --sumfile, --refresh or --resolve");
    }
    if cli.down && cli.step.is_none() {
        bail!("--step is required with --down (use --step 0 to reset every migration)");
    }

    let step = cli.step.unwrap_or(0);
    let Ok(step) = u64::try_from(step) else {
        bail!("--step cannot be negative (got {step})");
    };

    Ok(if cli.up {
        Steps::Up(step)
    } else {
        Steps::Down(step)
    })
}

/// Ask before resetting every migration. Anything but `y` declines.
pub(crate) fn confirm_reset(mut reader: impl BufRead, mut writer: impl Write) -> Result<bool> {
    writeln!(
        writer,
        "You set the 'step' parameter to 0, this resets all migrations. Do you want to continue? (y/n)"
    )?;
    writer.flush()?;

    let mut response = String::new();
    reader
        .read_line(&mut response)
        .context("Failed to read confirmation")?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

#[derive(Serialize)]
struct CreatedJson<'a> {
    name: &'a str,
    revision: Version,
}

#[derive(Serialize)]
struct ActionsJson<'a> {
    dropped: Vec<&'a str>,
    created: Vec<CreatedJson<'a>>,
}

impl<'a> From<&'a ObjectActions> for ActionsJson<'a> {
    fn from(actions: &'a ObjectActions) -> Self {
        Self {
            dropped: actions.dropped.iter().map(|n| n.as_str()).collect(),
            created: actions
                .created
                .iter()
                .map(|(name, revision)| CreatedJson {
                    name: name.as_str(),
                    revision: *revision,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct StepJson<'a> {
    from: Version,
    to: Version,
    #[serde(flatten)]
    actions: ActionsJson<'a>,
}

#[derive(Serialize)]
struct RunReportJson<'a> {
    start: Version,
    target: Version,
    dropped_first: Vec<&'a str>,
    steps: Vec<StepJson<'a>>,
}

impl<'a> From<&'a RunReport> for RunReportJson<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            start: report.plan.start,
            target: report.plan.target,
            dropped_first: report.dropped_first.iter().map(|n| n.as_str()).collect(),
            steps: report
                .steps
                .iter()
                .map(|step| StepJson {
                    from: step.from,
                    to: step.to,
                    actions: ActionsJson::from(&step.actions),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct RefreshJson<'a> {
    version: Version,
    #[serde(flatten)]
    actions: ActionsJson<'a>,
}

/// Render planned refresh actions in the requested format
pub(crate) fn format_refresh_report(
    actions: &ObjectActions,
    version: Version,
    format: OutputFormat,
    version_pad: usize,
) -> Result<String> {
    if format == OutputFormat::Json {
        let json = RefreshJson {
            version,
            actions: ActionsJson::from(actions),
        };
        return Ok(serde_json::to_string_pretty(&json)?);
    }

    let mut out = format!("Refresh at version {version}\n");
    push_actions(&mut out, actions, version_pad);
    Ok(out)
}

fn push_actions(out: &mut String, actions: &ObjectActions, version_pad: usize) {
    if actions.is_empty() {
        out.push_str("  no object changes\n");
    }
    for name in &actions.dropped {
        out.push_str(&format!("  drop   {name}\n"));
    }
    for (name, revision) in &actions.created {
        out.push_str(&format!(
            "  create {name} (revision {})\n",
            lpad(*revision, version_pad)
        ));
    }
}

/// Render a run report in the requested format
pub(crate) fn format_run_report(
    report: &RunReport,
    format: OutputFormat,
    version_pad: usize,
) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&RunReportJson::from(report))?);
    }

    let plan = report.plan;
    let mut out = String::new();
    match plan.direction() {
        None => {
            out.push_str(&format!("Already at version {}, nothing to do\n", plan.start));
            return Ok(out);
        }
        Some(direction) => out.push_str(&format!(
            "Plan: {direction} from version {} to {} ({} step(s))\n",
            plan.start,
            plan.target,
            plan.step_count()
        )),
    }

    if !report.dropped_first.is_empty() {
        let names: Vec<&str> = report.dropped_first.iter().map(|n| n.as_str()).collect();
        out.push_str(&format!("  drop all: {}\n", names.join(", ")));
    }
    for step in &report.steps {
        out.push_str(&format!("Step {} -> {}\n", step.from, step.to));
        push_actions(&mut out, &step.actions, version_pad);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;

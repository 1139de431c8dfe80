//! Migrate command implementation

use anyhow::{Context, Result};
use om_migrate::{preview_run, FileMigrator, MigrationEngine, Steps, Stepper};

use crate::cli::Cli;
use crate::commands::common::{
    confirm_reset, connect, format_run_report, load_catalog, load_config, load_migrations,
    peek_version, requested_steps,
};

/// Step the schema up or down, keeping objects in line
pub(crate) fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let steps = requested_steps(cli)?;
    let catalog = load_catalog(&config)?;
    let source = load_migrations(&config)?;

    if steps == Steps::Down(0) && !cli.dry_run && !cli.yes {
        let stdin = std::io::stdin();
        if !confirm_reset(stdin.lock(), std::io::stdout())? {
            println!("Operation cancelled");
            return Ok(());
        }
    }

    if cli.dry_run {
        let current = peek_version(&config)?;
        let report = preview_run(&catalog, current, steps, source.highest_version())?;
        print!(
            "{}",
            format_run_report(&report, cli.output, config.version_pad)?
        );
        return Ok(());
    }

    let db = connect(&config)?;

    let mut engine = FileMigrator::new(&db, source)?;
    let report = Stepper::new(&mut engine, &db, &catalog)
        .run(steps)
        .context("Migration failed")?;

    let version = engine.version()?.version;
    println!(
        "Schema at version {version} ({} step(s) applied)",
        report.steps.len()
    );
    Ok(())
}

//! Refresh command implementation

use anyhow::{Context, Result};
use om_migrate::{refresh_actions, FileMigrator, Stepper};

use crate::cli::Cli;
use crate::commands::common::{
    connect, format_refresh_report, load_catalog, load_config, load_migrations, peek_version,
};

/// Drop every object and recreate the definitions in force at the applied
/// version. With `--dry-run` the actions are printed and nothing is executed.
pub(crate) fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let catalog = load_catalog(&config)?;

    if cli.dry_run {
        let version = peek_version(&config)?;
        let actions = refresh_actions(&catalog, version);
        print!(
            "{}",
            format_refresh_report(&actions, version, cli.output, config.version_pad)?
        );
        return Ok(());
    }

    let source = load_migrations(&config)?;
    let db = connect(&config)?;

    let mut engine = FileMigrator::new(&db, source)?;
    let mut stepper = Stepper::new(&mut engine, &db, &catalog);
    let version = stepper.current_version()?;
    let actions = stepper.refresh().context("Refresh failed")?;

    println!(
        "Recreated {} object(s) at version {version}",
        actions.created.len()
    );
    Ok(())
}

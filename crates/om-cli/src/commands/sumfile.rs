//! Sumfile command implementation

use anyhow::{Context, Result};
use om_core::{create_objects_file, render_sumfiles};

use crate::cli::Cli;
use crate::commands::common::{load_catalog, load_config};

/// Write the create-sumfile and drop-file for the current object definitions.
///
/// With `--dry-run` both scripts are printed instead of written.
pub(crate) fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let catalog = load_catalog(&config)?;

    if cli.dry_run {
        let sumfiles = render_sumfiles(&catalog, &config).context("Rendering sumfile failed")?;
        println!("{}", sumfiles.create_sql);
        print!("{}", sumfiles.drop_sql);
        return Ok(());
    }

    create_objects_file(&catalog, &config).context("Creating sumfile failed")?;

    println!(
        "Wrote {} object(s) to {} and {}",
        catalog.len(),
        config.create_filename.display(),
        config.drop_filename.display()
    );
    Ok(())
}

//! Resolve command implementation

use anyhow::Result;
use om_core::{Resolver, Version};
use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use crate::commands::common::{load_catalog, load_config};

#[derive(Serialize)]
struct ResolvedJson {
    name: String,
    priority: u64,
    kind: String,
    path: Option<String>,
}

/// Print, per object, the file selected for migration step `step`
pub(crate) fn execute(step: Version, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let catalog = load_catalog(&config)?;
    let resolver = Resolver::new(&catalog, config.resolution_policy);
    let files = resolver.files_for_step(step);

    if cli.output == OutputFormat::Json {
        let rows: Vec<ResolvedJson> = files
            .iter()
            .map(|file| ResolvedJson {
                name: file.object.name.to_string(),
                priority: file.object.priority,
                kind: file.object.kind.to_string(),
                path: file.path.map(|p| p.display().to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "Step {step} ({} policy, {} object(s))",
        resolver.policy(),
        files.len()
    );
    for file in &files {
        let path = file
            .path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<32} {path}",
            file.object.dir_name(config.priority_pad)
        );
    }
    Ok(())
}

//! Sumfile generation
//!
//! The create-sumfile holds the highest revision of every object in creation
//! order, so a fresh environment can be bootstrapped without replaying the
//! revision history. The drop-file removes every tracked object in reverse
//! order. Output is deterministic: no timestamps, and the create file carries
//! a checksum of its body.

use crate::catalog::ObjectCatalog;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::pad::lpad;
use crate::resolver::Resolver;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Rendered contents of the create and drop scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sumfiles {
    /// Script creating the current revision of every object
    pub create_sql: String,

    /// Script dropping every object
    pub drop_sql: String,
}

/// Render both scripts without touching the filesystem beyond reading
/// revision files.
pub fn render_sumfiles(catalog: &ObjectCatalog, config: &Config) -> CoreResult<Sumfiles> {
    let resolver = Resolver::new(catalog, config.resolution_policy);

    let mut body = String::new();
    for resolved in resolver.current() {
        let object = resolved.object;
        body.push_str(&format!(
            "-- {} revision {} ({})\n",
            object.dir_name(config.priority_pad),
            lpad(resolved.revision, config.version_pad),
            object.kind
        ));
        body.push_str(&resolved.create_sql()?);
        body.push_str("\n\n");
    }

    let mut create_sql = String::new();
    create_sql.push_str("-- objmigrate create script\n");
    create_sql.push_str(&format!("-- objects: {}\n", catalog.len()));
    create_sql.push_str(&format!("-- checksum: sha256:{}\n\n", checksum(&body)));
    create_sql.push_str(&body);

    Ok(Sumfiles {
        create_sql,
        drop_sql: drop_script(catalog),
    })
}

/// Script dropping every tracked object, highest priority first.
pub fn drop_script(catalog: &ObjectCatalog) -> String {
    let mut sql = String::new();
    sql.push_str("-- objmigrate drop script\n");
    sql.push_str(&format!("-- objects: {}\n\n", catalog.len()));
    for object in catalog.drop_order() {
        sql.push_str(&object.drop_sql());
        sql.push('\n');
    }
    sql
}

/// Render both scripts and write them to the configured paths, overwriting
/// existing files.
pub fn create_objects_file(catalog: &ObjectCatalog, config: &Config) -> CoreResult<Sumfiles> {
    let sumfiles = render_sumfiles(catalog, config)?;
    write_file(&config.create_filename, &sumfiles.create_sql)?;
    write_file(&config.drop_filename, &sumfiles.drop_sql)?;
    log::info!(
        "Wrote {} objects to {} and {}",
        catalog.len(),
        config.create_filename.display(),
        config.drop_filename.display()
    );
    Ok(sumfiles)
}

fn write_file(path: &Path, contents: &str) -> CoreResult<()> {
    let write_err = |e| CoreError::WriteFailed {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)
}

/// Hex SHA-256 of `s`
fn checksum(s: &str) -> String {
    format!("{:x}", Sha256::digest(s.as_bytes()))
}

#[cfg(test)]
#[path = "sumfile_test.rs"]
mod tests;

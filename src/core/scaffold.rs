//! Starter policy scaffolding for `purview init`.
//!
//! - **Never scaffold over existing files**: requires an explicit `--force`
//! - **Dry-run mode available**: `--dry-run` logs intended writes only
//! - **Templates are embedded**: content comes from the binary, not
//!   external files

use crate::core::assets;
use crate::core::config::{DEFAULT_POLICY_FILENAME, ScanConfig};
use crate::core::error::PurviewError;
use std::fs;
use std::path::PathBuf;

/// Scaffolding operation configuration.
pub struct ScaffoldOptions {
    /// Directory the starter policy is written into.
    pub target_dir: PathBuf,
    /// Template variant: `generic`, `django`, or `react`.
    pub template: String,
    /// Force overwrite of an existing policy file.
    pub force: bool,
    /// Preview mode, log actions without writing files.
    pub dry_run: bool,
}

/// Write a starter policy file into the target directory.
///
/// The file name follows the scan config (first configured policy
/// filename), so a tree configured for `GUIDE.md` scaffolds `GUIDE.md`.
/// Returns the destination path, written or not.
pub fn scaffold_policy_file(
    opts: &ScaffoldOptions,
    config: &ScanConfig,
) -> Result<PathBuf, PurviewError> {
    let content = assets::template_for_variant(&opts.template).ok_or_else(|| {
        PurviewError::ValidationError(format!(
            "unknown template variant '{}' (expected generic, django, or react)",
            opts.template
        ))
    })?;

    let file_name = config
        .policy_filenames
        .first()
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_POLICY_FILENAME);
    let dest = opts.target_dir.join(file_name);

    if dest.exists() && !opts.force {
        if opts.dry_run {
            println!(
                "  would-skip: {} (exists; pass --force to overwrite)",
                dest.display()
            );
            return Ok(dest);
        }
        return Err(PurviewError::ValidationError(format!(
            "Refusing to overwrite existing path without --force: {}",
            dest.display()
        )));
    }

    if opts.dry_run {
        println!("  would-write: {}", dest.display());
        return Ok(dest);
    }

    fs::create_dir_all(&opts.target_dir).map_err(PurviewError::IoError)?;
    fs::write(&dest, content).map_err(PurviewError::IoError)?;
    println!("  wrote: {}", dest.display());
    Ok(dest)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "scaffold",
        "version": "1.0.0",
        "description": "Embedded starter policy templates written by `purview init`",
        "commands": [
            { "name": "init", "description": "Write a starter policy file (generic, django, or react variant)" }
        ],
        "storage": []
    })
}

//! Scan conventions, optionally overridden by a `purview.toml` at the root.
//!
//! The config file is never required: an absent file means defaults. A file
//! that exists but does not parse, or that carries unknown keys, is a hard
//! validation failure rather than a silent fallback.

use crate::core::error::PurviewError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up at the scan root.
pub const CONFIG_FILE_NAME: &str = "purview.toml";

/// Policy filename matched when nothing is configured.
pub const DEFAULT_POLICY_FILENAME: &str = "AGENTS.md";

const DEFAULT_IGNORE_DIRS: &[&str] = &[".git", "target", "node_modules", ".hg", ".svn"];

/// Conventions applied during an index scan: which file names count as
/// policy files, and which directory names are never descended into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    #[serde(default = "default_policy_filenames")]
    pub policy_filenames: Vec<String>,
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
}

fn default_policy_filenames() -> Vec<String> {
    vec![DEFAULT_POLICY_FILENAME.to_string()]
}

fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            policy_filenames: default_policy_filenames(),
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

impl ScanConfig {
    pub fn is_policy_filename(&self, name: &str) -> bool {
        self.policy_filenames.iter().any(|f| f == name)
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    scan: Option<ScanConfig>,
}

/// Load scan conventions from `<root>/purview.toml`, falling back to
/// defaults when the file is absent.
pub fn load_scan_config(root: &Path) -> Result<ScanConfig, PurviewError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ScanConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(PurviewError::IoError)?;
    let parsed: ConfigFile = toml::from_str(&content).map_err(|e| {
        PurviewError::ValidationError(format!("{}: {}", config_path.display(), e))
    })?;
    let config = parsed.scan.unwrap_or_default();

    if config.policy_filenames.is_empty() {
        return Err(PurviewError::ValidationError(format!(
            "{}: policy_filenames must not be empty",
            config_path.display()
        )));
    }
    Ok(config)
}

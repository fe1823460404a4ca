//! Nearest-ancestor-wins precedence walk over a policy snapshot.
//!
//! The walk starts at the query's immediate parent and climbs toward the
//! snapshot root; the first directory carrying a policy wins. A path with
//! no governing policy is a normal unpoliced result, never an error.

use crate::core::error::PurviewError;
use crate::core::index::{PolicyFile, PolicyIndex, normalize_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of resolving one query path against a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Normalized absolute query path.
    pub query: PathBuf,
    /// Governing policy, or `None` when the path is unpoliced.
    pub policy: Option<PolicyFile>,
    /// Every ancestor directory inspected, in walk order, ending at the
    /// match (or at the root when unpoliced).
    pub considered: Vec<PathBuf>,
}

impl ResolutionResult {
    pub fn is_unpoliced(&self) -> bool {
        self.policy.is_none()
    }
}

/// Resolve the policy governing `path`.
///
/// Relative paths are joined to the snapshot root. Absolute paths must live
/// under the root; anything else is a caller bug, not an unpoliced result.
/// The query path itself does not need to exist on disk.
pub fn resolve(index: &PolicyIndex, path: &Path) -> Result<ResolutionResult, PurviewError> {
    let query = if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&index.root().join(path))
    };

    if !query.starts_with(index.root()) {
        return Err(PurviewError::ValidationError(format!(
            "query path {} is outside the indexed root {}",
            query.display(),
            index.root().display()
        )));
    }
    if query == index.root() {
        return Err(PurviewError::ValidationError(format!(
            "query path must be below the indexed root {}",
            index.root().display()
        )));
    }

    let mut considered: Vec<PathBuf> = Vec::new();
    let mut matched: Option<PolicyFile> = None;
    // skip(1): the query path itself never governs, its parent does.
    for ancestor in query.ancestors().skip(1) {
        considered.push(ancestor.to_path_buf());
        if let Some(policy) = index.get(ancestor) {
            matched = Some(policy.clone());
            break;
        }
        if ancestor == index.root() {
            break;
        }
    }

    Ok(ResolutionResult {
        query,
        policy: matched,
        considered,
    })
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "resolve",
        "version": "1.0.0",
        "description": "Nearest-ancestor-wins policy resolution for a file path",
        "commands": [
            { "name": "resolve", "description": "Walk ancestors from the immediate parent up; first policy wins" }
        ],
        "storage": []
    })
}

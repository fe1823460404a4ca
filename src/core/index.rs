//! Policy index: one immutable snapshot of every policy file in a tree.
//!
//! A snapshot is built by a single depth-first scan. Symlinked policy files
//! are resolved to their real source at build time, so queries against the
//! finished index never touch the filesystem. Rebuilding constructs a whole
//! new value; an index is never mutated in place.

use crate::core::config::ScanConfig;
use crate::core::error::PurviewError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// One policy file, keyed by the directory whose subtree it governs.
///
/// When the scanned entry was a symlink, `symlink_target` holds the real
/// source the chain resolved to and `content` is that target's text. The
/// policy still claims the symlink's own directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Directory whose subtree this policy governs.
    pub dir: PathBuf,
    /// The file entry found during the scan (the symlink itself, if any).
    pub file_path: PathBuf,
    /// Resolved real source when the entry was a symlink.
    pub symlink_target: Option<PathBuf>,
    /// Policy text, read eagerly at build time.
    pub content: String,
    /// SHA-256 hex digest of `content`.
    pub digest: String,
}

/// Immutable snapshot mapping directory paths to their policy files.
#[derive(Debug, Clone)]
pub struct PolicyIndex {
    root: PathBuf,
    entries: BTreeMap<PathBuf, PolicyFile>,
}

/// Serializable view of a snapshot, printed by `purview scan --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub fingerprint: String,
    pub policies: Vec<PolicyFile>,
}

impl PolicyIndex {
    /// Scan `root` and build a fresh snapshot.
    ///
    /// The build is atomic: any error (unreadable directory, symlink cycle,
    /// dangling target, ambiguous directory) aborts the whole build and no
    /// partial snapshot escapes.
    pub fn build(root: &Path, config: &ScanConfig) -> Result<PolicyIndex, PurviewError> {
        let root = match fs::canonicalize(root) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PurviewError::NotFound(format!(
                    "scan root does not exist: {}",
                    root.display()
                )));
            }
            Err(e) => return Err(PurviewError::IoError(e)),
        };
        if !root.is_dir() {
            return Err(PurviewError::NotFound(format!(
                "scan root is not a directory: {}",
                root.display()
            )));
        }

        let mut entries = BTreeMap::new();
        scan_dir(&root, config, &mut entries)?;
        Ok(PolicyIndex { root, entries })
    }

    /// Re-run the scan with the same root, returning a fresh snapshot.
    pub fn rebuild(&self, config: &ScanConfig) -> Result<PolicyIndex, PurviewError> {
        PolicyIndex::build(&self.root, config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Policy claiming exactly `dir`, if any.
    pub fn get(&self, dir: &Path) -> Option<&PolicyFile> {
        self.entries.get(dir)
    }

    /// Directories carrying a policy, in sorted order.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(|p| p.as_path())
    }

    pub fn policies(&self) -> impl Iterator<Item = &PolicyFile> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 over the sorted (directory, digest) pairs. Two scans of an
    /// unchanged tree produce equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (dir, policy) in &self.entries {
            hasher.update(dir.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(policy.digest.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn scan_report(&self) -> ScanReport {
        ScanReport {
            root: self.root.clone(),
            fingerprint: self.fingerprint(),
            policies: self.entries.values().cloned().collect(),
        }
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// SHA-256 hex digest of a text blob.
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn scan_dir(
    dir: &Path,
    config: &ScanConfig,
    entries: &mut BTreeMap<PathBuf, PolicyFile>,
) -> Result<(), PurviewError> {
    let mut dir_entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(PurviewError::IoError)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(PurviewError::IoError)?;
    // read_dir order is platform-dependent; sort for deterministic scans.
    dir_entries.sort_by_key(|e| e.file_name());

    let mut matches: Vec<PathBuf> = Vec::new();
    let mut subdirs: Vec<PathBuf> = Vec::new();

    for entry in dir_entries {
        let file_type = entry.file_type().map_err(PurviewError::IoError)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        // `file_type` does not follow symlinks, so a symlinked directory
        // never lands in `subdirs` and is never descended into.
        if file_type.is_dir() {
            if !config.is_ignored_dir(&name) {
                subdirs.push(entry.path());
            }
            continue;
        }
        if config.is_policy_filename(&name) {
            matches.push(entry.path());
        }
    }

    match matches.len() {
        0 => {}
        1 => {
            let policy = load_policy(dir, &matches[0])?;
            entries.insert(dir.to_path_buf(), policy);
        }
        _ => {
            let names = matches
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PurviewError::AmbiguousPolicy(format!(
                "{} claims more than one policy file: {}",
                dir.display(),
                names
            )));
        }
    }

    for subdir in subdirs {
        scan_dir(&subdir, config, entries)?;
    }
    Ok(())
}

fn load_policy(dir: &Path, file_path: &Path) -> Result<PolicyFile, PurviewError> {
    let symlink_target = resolve_symlink_chain(file_path)?;
    let source = symlink_target.as_deref().unwrap_or(file_path);
    let content = fs::read_to_string(source).map_err(PurviewError::IoError)?;
    let digest = content_digest(&content);
    Ok(PolicyFile {
        dir: dir.to_path_buf(),
        file_path: file_path.to_path_buf(),
        symlink_target,
        content,
        digest,
    })
}

/// Follow a symlink chain to a regular file.
///
/// Returns `None` for a regular file, `Some(real_path)` for a resolved
/// chain. Relative link targets resolve against the link's own parent
/// directory; targets may land outside the scanned tree. A revisited path
/// is a cycle; a chain ending on a missing path is a dangling link.
fn resolve_symlink_chain(file_path: &Path) -> Result<Option<PathBuf>, PurviewError> {
    let meta = file_path.symlink_metadata().map_err(PurviewError::IoError)?;
    if !meta.file_type().is_symlink() {
        return Ok(None);
    }

    let mut visited: FxHashSet<PathBuf> = FxHashSet::default();
    let mut chain: Vec<String> = Vec::new();
    let mut current = file_path.to_path_buf();
    visited.insert(current.clone());
    chain.push(current.display().to_string());

    loop {
        let target = fs::read_link(&current).map_err(PurviewError::IoError)?;
        let next = if target.is_absolute() {
            target
        } else {
            current.parent().unwrap_or(Path::new("")).join(target)
        };
        let next = normalize_path(&next);
        chain.push(next.display().to_string());

        if !visited.insert(next.clone()) {
            return Err(PurviewError::SymlinkCycle(chain.join(" -> ")));
        }

        let meta = match next.symlink_metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PurviewError::NotFound(format!(
                    "symlink target does not exist: {}",
                    chain.join(" -> ")
                )));
            }
            Err(e) => return Err(PurviewError::IoError(e)),
        };
        if meta.file_type().is_symlink() {
            current = next;
            continue;
        }
        return Ok(Some(next));
    }
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "index",
        "version": "1.0.0",
        "description": "Immutable per-directory policy snapshot with build-time symlink resolution",
        "commands": [
            { "name": "scan", "description": "Build the index and report every entry plus the snapshot fingerprint" },
            { "name": "list", "description": "List directories carrying a policy file" }
        ],
        "storage": []
    })
}

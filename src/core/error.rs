use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PurviewError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Symlink cycle: {0}")]
    SymlinkCycle(String),
    #[error("Ambiguous policy: {0}")]
    AmbiguousPolicy(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

//! Unified error type for the harness.

use std::path::PathBuf;
use thiserror::Error;

/// Errors the harness can surface. Everything here is fatal to the run;
/// fingerprint collisions are diagnostics, not errors, and engine contract
/// violations are programming bugs that panic instead.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Reading a dictionary or stream file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every dictionary line was dropped or the dictionaries were empty.
    #[error("dictionary contains no usable patterns")]
    EmptyDictionary,
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

//! Error types for sheets-quickstart.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading the cached OAuth token.
#[derive(Error, Debug)]
pub enum TokenCacheError {
    #[error("No cached token at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read cached token from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cached token from {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while walking the values returned by a read.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DriverError {
    #[error("Row {index} has {len} cell(s), expected at least 2")]
    ShortRow { index: usize, len: usize },
}

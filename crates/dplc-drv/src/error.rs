//! Driver error types.

use std::path::PathBuf;

use thiserror::Error;

/// Error writing the generated file tree to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Filesystem operation failed at `path`.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for file locking

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("LOCK_TIMEOUT: timed out waiting for lock on {} ({description})", path.display())]
    Timeout { path: PathBuf, description: String },

    #[error("LOCK_IO_ERROR: failed to {operation} on {}: {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    },
}

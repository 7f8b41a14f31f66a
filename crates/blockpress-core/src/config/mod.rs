//! Configuration and data directory resolution

pub mod consts;
pub mod model;

pub use model::{BlockpressConfig, ClipboardConfig, EditorConfig, StorageConfig};

use crate::error::{BlockpressError, Result};
use std::path::{Path, PathBuf};

/// Loads `blockpress.toml` from the data directory, defaults when absent
pub fn load(data_dir: &Path) -> Result<BlockpressConfig> {
    let path = data_dir.join(consts::files::CONFIG_FILE);
    if !path.exists() {
        log::debug!("No {} in {}, using defaults", consts::files::CONFIG_FILE, data_dir.display());
        return Ok(BlockpressConfig::default());
    }
    BlockpressConfig::from_file(&path)
}

/// Resolves the data directory
///
/// Precedence: explicit path, then `BLOCKPRESS_HOME`, then the platform data
/// directory joined with `blockpress`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(home) = std::env::var_os(consts::HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    dirs::data_dir()
        .map(|dir| dir.join("blockpress"))
        .ok_or(BlockpressError::DataDirUnavailable)
}

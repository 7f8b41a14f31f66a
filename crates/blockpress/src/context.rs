//! Global context for CLI commands

use anyhow::{Result, anyhow};
use blockpress_core::config::{self, BlockpressConfig};
use blockpress_core::store::{FileStorage, PersistError, SaveOutcome, Workspace};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Resolved data directory, its configuration and the loaded workspace
pub struct Context {
    pub data_dir: PathBuf,
    pub config: BlockpressConfig,
    pub workspace: Workspace,
    pub verbose: bool,
}

impl Context {
    /// Resolve the data directory and load the saved workspace
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No data directory can be determined
    /// - blockpress.toml cannot be parsed
    ///
    /// Unreadable or unsavable data is reported as a warning and the command
    /// runs on the in-memory workspace.
    pub fn open(data_dir: Option<&Path>, verbose: bool) -> Result<Self> {
        let data_dir = config::resolve_data_dir(data_dir)?;
        let config = config::load(&data_dir)?;
        log::info!("Using data directory {}", data_dir.display());

        let storage = FileStorage::new(data_dir.clone());
        let (workspace, notices) = Workspace::load_with_config(Box::new(storage), &config);

        for notice in notices {
            eprintln!("{} {}", "warning:".yellow().bold(), notice);
        }

        Ok(Self {
            data_dir,
            config,
            workspace,
            verbose,
        })
    }

    /// Save pending edits
    pub fn save(&mut self) -> Result<()> {
        match self.workspace.flush() {
            Ok(Some(SaveOutcome::Saved { bytes })) => {
                log::info!("Saved {} bytes to {}", bytes, self.data_dir.display());
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => Err(anyhow!(describe_persist_error(&e))),
        }
    }
}

/// User-facing message for a failed save
fn describe_persist_error(error: &PersistError) -> String {
    match error {
        PersistError::QuotaExceeded { key } => format!(
            "storage is full, '{}' was not saved. Free disk space or delete unused patterns",
            key
        ),
        PersistError::Unavailable(reason) => {
            format!("storage is unavailable ({}). Changes were not saved", reason)
        }
        PersistError::TooLarge { size, limit } => format!(
            "saved data is too large ({} bytes, limit {}). Remove blocks or patterns, or raise storage.max_bytes in blockpress.toml",
            size, limit
        ),
        other => format!("failed to save: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_too_large_mentions_limit_setting() {
        let msg = describe_persist_error(&PersistError::TooLarge { size: 10, limit: 5 });
        assert!(msg.contains("10 bytes"));
        assert!(msg.contains("storage.max_bytes"));
    }

    #[test]
    fn test_describe_quota_names_key() {
        let msg = describe_persist_error(&PersistError::QuotaExceeded {
            key: "customTagPatternsV2".to_string(),
        });
        assert!(msg.contains("storage is full"));
        assert!(msg.contains("customTagPatternsV2"));
    }
}

//! Test utilities for blockpress
//!
//! This crate provides shared testing utilities used across the blockpress workspace.

mod env;
pub mod fixtures;

pub use env::{ENV_LOCK, with_isolated_data_env};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// Keeps test data directories in one gitignored location that is easy to
/// inspect when a test fails.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or the directory
/// cannot be created. Use [`try_temp_dir_in_workspace`] to handle errors.
///
/// # Examples
///
/// ```rust
/// use blockpress_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let data_dir = temp.path().join("data");
/// std::fs::create_dir_all(&data_dir).unwrap();
/// assert!(data_dir.exists());
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Fallible version of [`temp_dir_in_workspace`]
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_is_under_dot_tmp() {
        let temp = temp_dir_in_workspace();
        let parent = temp.path().parent().unwrap();
        assert_eq!(parent.file_name().unwrap(), ".tmp");
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let path = {
            let temp = temp_dir_in_workspace();
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}

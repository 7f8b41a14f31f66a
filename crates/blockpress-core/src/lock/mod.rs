//! Advisory file locks guarding the data directory
//!
//! Several `blockpress` processes may share one data directory. Writers take
//! an exclusive lock, readers a shared one, both through fs2 advisory locks
//! on a dedicated lock file.

use std::path::Path;
use std::time::Duration;

mod acquire;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;


/// How a lock is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// One holder at a time (writers)
    Exclusive,
    /// Any number of holders, excluded by an exclusive holder (readers)
    Shared,
}

/// Acquires an exclusive lock on `lock_path`, retrying until `timeout`.
///
/// The lock is released when the returned guard is dropped.
///
/// # Examples
///
/// ```no_run
/// use blockpress_core::lock::acquire_lock;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let lock_path = std::env::temp_dir().join("blockpress.lock");
/// let guard = acquire_lock(&lock_path, Duration::from_secs(30), "save patterns")?;
/// // Critical section here
/// drop(guard);
/// # Ok(())
/// # }
/// ```
pub fn acquire_lock(
    lock_path: &Path,
    timeout: Duration,
    description: &str,
) -> Result<LockGuard, LockError> {
    acquire::acquire_with_retry(lock_path, LockMode::Exclusive, timeout, description)
}

/// Acquires a shared lock on `lock_path`, retrying until `timeout`.
///
/// Shared holders coexist; they only wait for an exclusive holder, so a
/// reader never observes a half-written value.
pub fn acquire_shared_lock(
    lock_path: &Path,
    timeout: Duration,
    description: &str,
) -> Result<LockGuard, LockError> {
    acquire::acquire_with_retry(lock_path, LockMode::Shared, timeout, description)
}

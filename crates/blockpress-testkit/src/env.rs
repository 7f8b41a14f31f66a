//! Environment isolation for tests that read `BLOCKPRESS_HOME`

use std::sync::Mutex;

const HOME_ENV: &str = "BLOCKPRESS_HOME";

/// Serializes tests that modify environment variables
///
/// Recover from poisoning with `lock().unwrap_or_else(|p| p.into_inner())`:
/// a panicking test must not fail every later test.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with `BLOCKPRESS_HOME` set to `home`, or unset when `None`
///
/// The previous value is restored afterwards, also when `f` panics.
///
/// # Examples
///
/// ```rust
/// use blockpress_testkit::with_isolated_data_env;
///
/// with_isolated_data_env(Some("/tmp/blockpress-test"), || {
///     assert_eq!(std::env::var("BLOCKPRESS_HOME").unwrap(), "/tmp/blockpress-test");
/// });
/// ```
pub fn with_isolated_data_env<F, R>(home: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let original = std::env::var_os(HOME_ENV);
    let _restore = RestoreEnv { original };

    // SAFETY: ENV_LOCK is held, so no other test touches the environment concurrently.
    unsafe {
        match home {
            Some(value) => std::env::set_var(HOME_ENV, value),
            None => std::env::remove_var(HOME_ENV),
        }
    }

    f()
}

struct RestoreEnv {
    original: Option<std::ffi::OsString>,
}

impl Drop for RestoreEnv {
    fn drop(&mut self) {
        // SAFETY: dropped before the ENV_LOCK guard declared ahead of it.
        unsafe {
            match self.original.take() {
                Some(value) => std::env::set_var(HOME_ENV, value),
                None => std::env::remove_var(HOME_ENV),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_and_restores() {
        let before = std::env::var_os(HOME_ENV);
        with_isolated_data_env(Some("/isolated"), || {
            assert_eq!(std::env::var(HOME_ENV).unwrap(), "/isolated");
        });
        assert_eq!(std::env::var_os(HOME_ENV), before);
    }

    #[test]
    fn test_unsets_when_none() {
        with_isolated_data_env(None, || {
            assert!(std::env::var_os(HOME_ENV).is_none());
        });
    }

    #[test]
    fn test_restores_after_panic() {
        let before = std::env::var_os(HOME_ENV);
        let result = std::panic::catch_unwind(|| {
            with_isolated_data_env(Some("/panicking"), || panic!("boom"));
        });
        assert!(result.is_err());
        assert_eq!(std::env::var_os(HOME_ENV), before);
    }
}

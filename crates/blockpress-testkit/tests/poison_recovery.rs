//! Integration tests for mutex poison recovery
//!
//! These tests intentionally poison the environment lock. Poisoning lasts for
//! the lifetime of the test binary, so they run in their own binary.

use blockpress_testkit::{ENV_LOCK, with_isolated_data_env};
use std::thread;

#[test]
fn test_env_lock_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _guard = ENV_LOCK.lock().unwrap();
        panic!("Simulated panic to poison mutex");
    });
    let _ = handle.join();
    assert!(ENV_LOCK.is_poisoned());

    let result = std::panic::catch_unwind(|| {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
    });
    assert!(result.is_ok(), "Should recover from poisoned mutex");
}

#[test]
fn test_isolated_env_usable_after_poison() {
    let handle = thread::spawn(|| {
        with_isolated_data_env(Some("/poisoned"), || panic!("Simulated panic inside isolation"));
    });
    let _ = handle.join();

    let value = with_isolated_data_env(Some("/after"), || std::env::var("BLOCKPRESS_HOME").unwrap());
    assert_eq!(value, "/after");
}

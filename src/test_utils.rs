//! Test utilities shared across modules.
//!
//! This module provides synchronization primitives for tests that touch
//! process-global state.

use std::sync::Mutex;

/// Mutex to serialize tests that read or change environment variables.
///
/// Config directory resolution reads `XDG_CONFIG_HOME`, so any test that
/// sets it, or that calls code resolving the default config directory,
/// must hold this lock to avoid races during parallel test execution.
///
/// # Example
///
/// ```ignore
/// use crate::test_utils::ENV_MUTEX;
///
/// #[test]
/// fn test_that_changes_env() {
///     let _lock = ENV_MUTEX.lock().unwrap();
///     // ... test code that sets XDG_CONFIG_HOME ...
/// }
/// ```
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_mutex_can_be_acquired_multiple_times_sequentially() {
        {
            let _lock = ENV_MUTEX.lock().unwrap();
        }
        {
            let _lock = ENV_MUTEX.lock().unwrap();
        }
    }
}

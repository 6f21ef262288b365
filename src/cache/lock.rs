//! Lock Helpers
//!
//! Poison-tolerant locking for the cache mutexes.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

// == Mutex Lock ==
/// Locks a cache mutex, recovering the guard if a previous holder panicked.
///
/// Cache operations are total, so a poisoned lock must not turn into a
/// caller-visible failure. The state may be one half-applied write behind.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    cache: &str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                cache,
                result = "poisoned_recovered",
                "Recovered from poisoned cache lock"
            );
            poisoned.into_inner()
        }
    }
}

//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! cache, so keys that are never read again still free their slots.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheRegistry;

/// Spawns a task that sweeps `registry` once per `interval`.
///
/// The first sweep happens one full interval after spawning. Abort the
/// returned handle during shutdown.
pub fn spawn_sweep_task(registry: Arc<CacheRegistry>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs_f64(), "starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = registry.sweep_expired();
            if removed > 0 {
                info!(removed, "expiry sweep removed entries");
            } else {
                debug!("expiry sweep found nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Page;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let registry = Arc::new(CacheRegistry::new(100));
        registry
            .session_pages
            .set("expire_soon", Page::empty(), Duration::from_millis(10));

        let handle = spawn_sweep_task(registry.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Counted as an expiration, never as a miss
        let stats = registry.session_pages.stats();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let registry = Arc::new(CacheRegistry::new(100));
        registry
            .message_pages
            .set("long_lived", Page::empty(), Duration::from_secs(3600));

        let handle = spawn_sweep_task(registry.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(registry.message_pages.has("long_lived"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let registry = Arc::new(CacheRegistry::new(100));

        let handle = spawn_sweep_task(registry, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

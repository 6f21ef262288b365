//! Cache-aside read path.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::TtlCache;

/// Serves `key` from `cache`, or runs `fetch` and stores its result.
///
/// The cache lock is only taken for the lookup and for the final insert, so
/// `fetch` may await freely. Errors from `fetch` are returned untouched and
/// nothing is cached for them. Two concurrent misses on the same key both
/// fetch; the later write wins.
pub async fn with_cache<V, E, F, Fut>(
    cache: &TtlCache<V>,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<V, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.get(key) {
        debug!(cache = cache.name(), key, "cache hit");
        return Ok(value);
    }

    debug!(cache = cache.name(), key, "cache miss");
    let value = fetch().await?;
    cache.set(key, value.clone(), ttl);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct StoreDown;

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache = TtlCache::new("test", 10);
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let ttl = Duration::from_millis(1000);

        for _ in 0..2 {
            let value: Result<u32, StoreDown> = with_cache(&cache, "k", ttl, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
            assert_eq!(value, Ok(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn fetch_error_propagates_and_is_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new("test", 10);
        let ttl = Duration::from_secs(60);

        let result = with_cache(&cache, "k", ttl, || async { Err(StoreDown) }).await;
        assert_eq!(result, Err(StoreDown));
        assert!(!cache.has("k"));

        let result: Result<u32, StoreDown> =
            with_cache(&cache, "k", ttl, || async { Ok(3) }).await;
        assert_eq!(result, Ok(3));
        assert_eq!(cache.get("k"), Some(3));
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let cache = TtlCache::new("test", 10);
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let ttl = Duration::from_millis(20);

        let fetch = move || async move { Ok::<_, StoreDown>(counter.fetch_add(1, Ordering::SeqCst)) };

        assert_eq!(with_cache(&cache, "k", ttl, fetch).await, Ok(0));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(with_cache(&cache, "k", ttl, fetch).await, Ok(1));
    }

    #[tokio::test]
    async fn fetch_runs_without_holding_the_cache_lock() {
        let cache = Arc::new(TtlCache::new("test", 10));
        cache.set("other", 1, Duration::from_secs(60));

        let inner = Arc::clone(&cache);
        let value = with_cache(&cache, "k", Duration::from_secs(60), || async move {
            // Touching the cache from inside fetch would deadlock if the lock were held
            let other = inner.get("other").unwrap_or_default();
            tokio::task::yield_now().await;
            Ok::<_, StoreDown>(other + 1)
        })
        .await;

        assert_eq!(value, Ok(2));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test]
    async fn concurrent_misses_may_both_fetch() {
        let cache = Arc::new(TtlCache::new("test", 10));
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::from_secs(60);

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let counter: &AtomicUsize = &calls;
                    with_cache(&cache, "k", ttl, move || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, StoreDown>(9u32)
                    })
                    .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(9));
        }

        let fetched = calls.load(Ordering::SeqCst);
        assert!((1..=2).contains(&fetched));
        assert_eq!(cache.len(), 1);
    }
}

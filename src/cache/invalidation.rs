//! Entity-driven cache invalidation.
//!
//! Mutations call [`Invalidator::invalidate_by_entity`] once the Store has
//! committed. Calling it earlier lets a concurrent read repopulate the cache
//! with pre-mutation data.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheHandle, CacheKey};

/// Deletes cache entries that depend on a mutated entity.
///
/// Every registered cache is scanned in full, which costs O(keys held) and
/// stays bounded by each cache's capacity.
#[derive(Default)]
pub struct Invalidator {
    targets: Vec<Arc<dyn CacheHandle>>,
    coarse_namespaces: HashSet<String>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cache to the set scanned on invalidation.
    pub fn register(&mut self, cache: Arc<dyn CacheHandle>) {
        self.targets.push(cache);
    }

    /// Marks a listing/search namespace as wiped wholesale on every entity
    /// invalidation, since its aggregates may embed any entity.
    pub fn add_coarse_namespace(&mut self, namespace: &str) {
        self.coarse_namespaces.insert(namespace.to_string());
    }

    pub fn targets(&self) -> &[Arc<dyn CacheHandle>] {
        &self.targets
    }

    // == Invalidate By Entity ==
    /// Removes every key tagged with `id`, plus every key in a coarse
    /// namespace. Keys not produced by the key builder are left alone.
    ///
    /// Returns the number of entries removed; absent keys are a no-op.
    pub fn invalidate_by_entity(&self, id: &str) -> usize {
        let removed = self.remove_matching(|raw| match CacheKey::parse(raw) {
            Some(parts) => {
                parts.references(id) || self.coarse_namespaces.contains(parts.namespace)
            }
            None => false,
        });

        info!(entity = id, removed, "invalidated cache entries for entity");
        removed
    }

    fn remove_matching<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        self.targets
            .iter()
            .map(|target| {
                let removed = target.remove_where(&mut predicate);
                debug!(cache = target.name(), removed, "scanned cache for invalidation");
                removed
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::{NS_SESSION, NS_SESSION_SEARCH, NS_USER, NS_USER_SESSIONS};
    use crate::cache::TtlCache;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(60);

    fn key(ns: &str, id: &str) -> String {
        CacheKey::builder(ns).entity(id).param("limit", 20).build().into_string()
    }

    fn setup() -> (Arc<TtlCache<u32>>, Arc<TtlCache<String>>, Invalidator) {
        let records = Arc::new(TtlCache::new("records", 100));
        let lists = Arc::new(TtlCache::new("lists", 100));

        let mut invalidator = Invalidator::new();
        invalidator.register(records.clone());
        invalidator.register(lists.clone());
        invalidator.add_coarse_namespace(NS_SESSION_SEARCH);

        (records, lists, invalidator)
    }

    #[test]
    fn removes_only_keys_tagged_with_entity() {
        let (records, lists, invalidator) = setup();

        records.set(key(NS_USER, "id1"), 1, TTL);
        records.set(key(NS_USER, "id2"), 2, TTL);
        lists.set(key(NS_USER_SESSIONS, "id1"), "page".into(), TTL);
        lists.set(key(NS_USER_SESSIONS, "id2"), "page".into(), TTL);

        let removed = invalidator.invalidate_by_entity("id1");

        assert_eq!(removed, 2);
        assert!(!records.has(&key(NS_USER, "id1")));
        assert!(!lists.has(&key(NS_USER_SESSIONS, "id1")));
        assert!(records.has(&key(NS_USER, "id2")));
        assert!(lists.has(&key(NS_USER_SESSIONS, "id2")));
    }

    #[test]
    fn prefix_of_another_id_is_not_a_match() {
        let (records, _lists, invalidator) = setup();

        records.set(key(NS_SESSION, "abc"), 1, TTL);
        records.set(key(NS_SESSION, "abcd"), 2, TTL);

        invalidator.invalidate_by_entity("abc");

        assert!(!records.has(&key(NS_SESSION, "abc")));
        assert!(records.has(&key(NS_SESSION, "abcd")));
    }

    #[test]
    fn coarse_namespace_is_wiped_for_any_entity() {
        let (records, lists, invalidator) = setup();

        let search = CacheKey::builder(NS_SESSION_SEARCH)
            .param("search", "resume")
            .build()
            .into_string();
        lists.set(search.clone(), "hits".into(), TTL);
        records.set(key(NS_USER, "other"), 1, TTL);

        invalidator.invalidate_by_entity("unrelated");

        assert!(!lists.has(&search));
        assert!(records.has(&key(NS_USER, "other")));
    }

    #[test]
    fn invalidation_is_idempotent() {
        let (records, _lists, invalidator) = setup();
        records.set(key(NS_USER, "id1"), 1, TTL);

        assert_eq!(invalidator.invalidate_by_entity("id1"), 1);
        assert_eq!(invalidator.invalidate_by_entity("id1"), 0);
        assert_eq!(invalidator.invalidate_by_entity("never-cached"), 0);
    }

    #[test]
    fn foreign_keys_are_untouched() {
        let (records, _lists, invalidator) = setup();
        records.set("id1", 1, TTL);

        invalidator.invalidate_by_entity("id1");

        assert!(records.has("id1"));
    }
}

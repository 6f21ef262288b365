//! Process-wide cache instances.
//!
//! Built once at startup and handed to services by reference, so tests can
//! build isolated registries instead of sharing global state.

use std::sync::Arc;

use crate::cache::keys::NS_SESSION_SEARCH;
use crate::cache::{CacheHandle, CacheStats, Invalidator, TtlCache};
use crate::config::Config;
use crate::pagination::Page;
use crate::store::{ChatMessage, ChatSession, User};

/// Every cache the chat service reads through, plus the invalidator that
/// spans them.
pub struct CacheRegistry {
    pub users: Arc<TtlCache<User>>,
    pub sessions: Arc<TtlCache<ChatSession>>,
    pub session_pages: Arc<TtlCache<Page<ChatSession>>>,
    pub message_pages: Arc<TtlCache<Page<ChatMessage>>>,
    invalidator: Invalidator,
}

impl CacheRegistry {
    /// Creates every cache with room for `capacity` entries each.
    pub fn new(capacity: usize) -> Self {
        let users = Arc::new(TtlCache::new("users", capacity));
        let sessions = Arc::new(TtlCache::new("sessions", capacity));
        let session_pages = Arc::new(TtlCache::new("session_pages", capacity));
        let message_pages = Arc::new(TtlCache::new("message_pages", capacity));

        let mut invalidator = Invalidator::new();
        invalidator.register(users.clone());
        invalidator.register(sessions.clone());
        invalidator.register(session_pages.clone());
        invalidator.register(message_pages.clone());
        invalidator.add_coarse_namespace(NS_SESSION_SEARCH);

        Self {
            users,
            sessions,
            session_pages,
            message_pages,
            invalidator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// All caches, type-erased.
    pub fn handles(&self) -> &[Arc<dyn CacheHandle>] {
        self.invalidator.targets()
    }

    /// Sweeps expired entries out of every cache.
    pub fn sweep_expired(&self) -> usize {
        self.handles().iter().map(|cache| cache.sweep_expired()).sum()
    }

    /// Statistics per cache, in registration order.
    pub fn stats(&self) -> Vec<(String, CacheStats)> {
        self.handles()
            .iter()
            .map(|cache| (cache.name().to_string(), cache.stats()))
            .collect()
    }
}

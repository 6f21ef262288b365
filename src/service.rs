//! Chat Service Module
//!
//! Service layer over the chat store. Reads go through the caches with a TTL
//! per query shape; every mutation commits to the store first and then
//! invalidates the entities it touched.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::cache::keys::{
    NS_SESSION, NS_SESSION_MESSAGES, NS_SESSION_SEARCH, NS_USER, NS_USER_SESSIONS,
};
use crate::cache::{with_cache, CacheKey, CacheRegistry, CacheStats};
use crate::config::{CacheTtls, Config};
use crate::error::Result;
use crate::pagination::{paginate, Page, PageRequest};
use crate::store::{ChatMessage, ChatSession, ChatStore, MessageSource, Role, SessionSource, User};

// == Chat Service ==
pub struct ChatService {
    store: Arc<ChatStore>,
    caches: Arc<CacheRegistry>,
    ttls: CacheTtls,
    default_page_limit: usize,
    max_page_limit: usize,
}

impl ChatService {
    pub fn new(store: Arc<ChatStore>, caches: Arc<CacheRegistry>, config: &Config) -> Self {
        Self {
            store,
            caches,
            ttls: config.ttls(),
            default_page_limit: config.default_page_limit,
            max_page_limit: config.max_page_limit,
        }
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn caches(&self) -> &Arc<CacheRegistry> {
        &self.caches
    }

    /// Builds a page request from optional client input.
    pub fn page_request(&self, limit: Option<usize>, cursor: Option<String>) -> PageRequest {
        PageRequest::new(
            limit.unwrap_or(self.default_page_limit),
            cursor.filter(|c| !c.is_empty()),
            self.max_page_limit,
        )
    }

    // == Users ==
    pub async fn create_user(&self, name: String, email: String) -> User {
        self.store.create_user(name, email).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        let key = CacheKey::builder(NS_USER).entity(id).build();
        with_cache(&self.caches.users, key.as_str(), self.ttls.user, || {
            self.store.get_user(id)
        })
        .await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User> {
        let user = self.store.update_user(id, name, email).await?;
        self.invalidate(&[id]);
        Ok(user)
    }

    // == Sessions ==
    /// Pages through a user's sessions, newest activity first.
    ///
    /// A non-blank `search` restricts results to matching titles and is
    /// cached in the search namespace, which any mutation wipes.
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        request: &PageRequest,
        search: Option<&str>,
    ) -> Result<Page<ChatSession>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let namespace = if search.is_some() {
            NS_SESSION_SEARCH
        } else {
            NS_USER_SESSIONS
        };

        let key = CacheKey::builder(namespace)
            .entity(user_id)
            .param("limit", request.limit())
            .opt_param("cursor", request.cursor())
            .opt_param("search", search)
            .build();

        with_cache(
            &self.caches.session_pages,
            key.as_str(),
            self.ttls.session_list,
            || async move {
                let source = SessionSource::new(&self.store, user_id, search);
                paginate(&source, request).await
            },
        )
        .await
    }

    pub async fn get_session(&self, id: Uuid) -> Result<ChatSession> {
        let key = CacheKey::builder(NS_SESSION).entity(id).build();
        with_cache(&self.caches.sessions, key.as_str(), self.ttls.session, || {
            self.store.get_session(id)
        })
        .await
    }

    pub async fn create_session(&self, user_id: Uuid, title: String) -> Result<ChatSession> {
        let session = self.store.create_session(user_id, title).await?;
        self.invalidate(&[user_id]);
        Ok(session)
    }

    pub async fn rename_session(&self, id: Uuid, title: String) -> Result<ChatSession> {
        let session = self.store.rename_session(id, title).await?;
        self.invalidate(&[id, session.user_id]);
        Ok(session)
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<ChatSession> {
        let session = self.store.delete_session(id).await?;
        self.invalidate(&[id, session.user_id]);
        Ok(session)
    }

    // == Messages ==
    /// Pages through a session's messages, oldest first.
    pub async fn list_messages(
        &self,
        session_id: Uuid,
        request: &PageRequest,
    ) -> Result<Page<ChatMessage>> {
        let key = CacheKey::builder(NS_SESSION_MESSAGES)
            .entity(session_id)
            .param("limit", request.limit())
            .opt_param("cursor", request.cursor())
            .build();

        with_cache(
            &self.caches.message_pages,
            key.as_str(),
            self.ttls.message_list,
            || async move {
                let source = MessageSource::new(&self.store, session_id);
                paginate(&source, request).await
            },
        )
        .await
    }

    /// Appends a message; the session also moves to the top of its owner's list.
    pub async fn add_message(
        &self,
        session_id: Uuid,
        role: Role,
        content: String,
    ) -> Result<ChatMessage> {
        let (session, message) = self
            .store
            .create_message(session_id, role, content)
            .await?;
        self.invalidate(&[session_id, session.user_id]);
        Ok(message)
    }

    // == Stats ==
    pub fn cache_stats(&self) -> Vec<(String, CacheStats)> {
        self.caches.stats()
    }

    /// Drops cached data for `ids`. Only call after the store has committed.
    fn invalidate(&self, ids: &[Uuid]) {
        let removed: usize = ids
            .iter()
            .map(|id| {
                self.caches
                    .invalidator()
                    .invalidate_by_entity(&id.to_string())
            })
            .sum();
        info!(entities = ids.len(), removed, "post-commit invalidation");
    }
}

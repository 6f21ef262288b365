//! Chat Store Module
//!
//! In-memory stand-in for the application's database: users, chat sessions
//! and messages with the orderings the list views rely on. The cache layer
//! only reaches it through fetch closures and page sources.

mod records;
mod sources;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::pagination::TimeCursor;

pub use records::{ChatMessage, ChatSession, Role, User};
pub use sources::{MessageSource, SessionSource};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, ChatSession>,
    messages: HashMap<Uuid, ChatMessage>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Wall-clock time, nudged forward so no two writes share a timestamp.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

// == Chat Store ==
/// Thread-safe in-memory tables.
///
/// Every read query bumps a counter so callers can tell whether a value came
/// from the Store or from a cache.
#[derive(Debug, Default)]
pub struct ChatStore {
    tables: RwLock<Tables>,
    reads: AtomicU64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read queries served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    fn count_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    // == Users ==
    pub async fn create_user(&self, name: String, email: String) -> User {
        let mut tables = self.tables.write().await;
        let now = tables.stamp();
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "created user");
        user
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.count_read();
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| user_not_found(id))
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User> {
        let mut tables = self.tables.write().await;
        let now = tables.stamp();
        let user = tables.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;

        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.updated_at = now;

        Ok(user.clone())
    }

    // == Sessions ==
    pub async fn create_session(&self, user_id: Uuid, title: String) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(user_not_found(user_id));
        }

        let now = tables.stamp();
        let session = ChatSession {
            id: Uuid::new_v4(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(session.id, session.clone());

        debug!(session_id = %session.id, %user_id, "created session");
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<ChatSession> {
        self.count_read();
        self.tables
            .read()
            .await
            .sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| session_not_found(id))
    }

    pub async fn rename_session(&self, id: Uuid, title: String) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        let now = tables.stamp();
        let session = tables
            .sessions
            .get_mut(&id)
            .ok_or_else(|| session_not_found(id))?;

        session.title = title;
        session.updated_at = now;
        Ok(session.clone())
    }

    /// Deletes a session together with its messages.
    pub async fn delete_session(&self, id: Uuid) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        let session = tables
            .sessions
            .remove(&id)
            .ok_or_else(|| session_not_found(id))?;

        tables.messages.retain(|_, message| message.session_id != id);
        debug!(session_id = %id, "deleted session");
        Ok(session)
    }

    /// Sessions of `user_id`, newest activity first, strictly after `cursor`.
    ///
    /// `search` keeps sessions whose title contains it, ignoring case.
    pub async fn sessions_after(
        &self,
        user_id: Uuid,
        search: Option<&str>,
        cursor: Option<TimeCursor>,
        take: usize,
    ) -> Result<Vec<ChatSession>> {
        self.count_read();
        let tables = self.tables.read().await;
        if !tables.users.contains_key(&user_id) {
            return Err(user_not_found(user_id));
        }

        let needle = search.map(str::to_lowercase);
        let mut sessions: Vec<&ChatSession> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .filter(|s| {
                needle
                    .as_deref()
                    .map_or(true, |n| s.title.to_lowercase().contains(n))
            })
            .filter(|s| cursor.map_or(true, |c| s.sort_key() < c.key()))
            .collect();

        sessions.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        Ok(sessions.into_iter().take(take).cloned().collect())
    }

    // == Messages ==
    /// Appends a message and marks its session as recently active.
    ///
    /// Returns the session as updated by the same write, alongside the message.
    pub async fn create_message(
        &self,
        session_id: Uuid,
        role: Role,
        content: String,
    ) -> Result<(ChatSession, ChatMessage)> {
        let mut tables = self.tables.write().await;
        let now = tables.stamp();

        let session = tables
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        session.updated_at = now;
        let session = session.clone();

        let message = ChatMessage {
            id: Uuid::new_v4(),
            session_id,
            role,
            content,
            created_at: now,
        };
        tables.messages.insert(message.id, message.clone());
        Ok((session, message))
    }

    /// Messages of `session_id`, oldest first, strictly after `cursor`.
    pub async fn messages_after(
        &self,
        session_id: Uuid,
        cursor: Option<TimeCursor>,
        take: usize,
    ) -> Result<Vec<ChatMessage>> {
        self.count_read();
        let tables = self.tables.read().await;
        if !tables.sessions.contains_key(&session_id) {
            return Err(session_not_found(session_id));
        }

        let mut messages: Vec<&ChatMessage> = tables
            .messages
            .values()
            .filter(|m| m.session_id == session_id)
            .filter(|m| cursor.map_or(true, |c| m.sort_key() > c.key()))
            .collect();

        messages.sort_by_key(|m| m.sort_key());
        Ok(messages.into_iter().take(take).cloned().collect())
    }
}

fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("user {id}"))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id}"))
}

//! Page sources over the chat store's ordered queries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::pagination::{PageSource, TimeCursor};

use super::{ChatMessage, ChatSession, ChatStore};

fn decode(cursor: Option<&str>) -> Result<Option<TimeCursor>, AppError> {
    cursor.map(TimeCursor::decode).transpose().map_err(AppError::from)
}

/// A user's sessions, newest activity first, optionally filtered by title.
pub struct SessionSource<'a> {
    store: &'a ChatStore,
    user_id: Uuid,
    search: Option<&'a str>,
}

impl<'a> SessionSource<'a> {
    pub fn new(store: &'a ChatStore, user_id: Uuid, search: Option<&'a str>) -> Self {
        Self {
            store,
            user_id,
            search,
        }
    }
}

#[async_trait]
impl PageSource for SessionSource<'_> {
    type Item = ChatSession;
    type Error = AppError;

    async fn fetch_after(
        &self,
        cursor: Option<&str>,
        take: usize,
    ) -> Result<Vec<ChatSession>, AppError> {
        let cursor = decode(cursor)?;
        self.store
            .sessions_after(self.user_id, self.search, cursor, take)
            .await
    }
}

/// A session's messages, oldest first.
pub struct MessageSource<'a> {
    store: &'a ChatStore,
    session_id: Uuid,
}

impl<'a> MessageSource<'a> {
    pub fn new(store: &'a ChatStore, session_id: Uuid) -> Self {
        Self { store, session_id }
    }
}

#[async_trait]
impl PageSource for MessageSource<'_> {
    type Item = ChatMessage;
    type Error = AppError;

    async fn fetch_after(
        &self,
        cursor: Option<&str>,
        take: usize,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let cursor = decode(cursor)?;
        self.store
            .messages_after(self.session_id, cursor, take)
            .await
    }
}

//! Cursor Pagination Module
//!
//! Forward-only pagination over an ordered source. The paginator keeps no
//! state of its own: the caller carries `next_cursor` into the next request.

mod cursor;

#[cfg(test)]
mod property_tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cursor::{CursorError, TimeCursor};

// == Page Request ==
/// A request for one page: at most `limit` items after `cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    limit: usize,
    cursor: Option<String>,
}

impl PageRequest {
    /// Builds a request, clamping `limit` into `1..=max_limit`.
    pub fn new(limit: usize, cursor: Option<String>, max_limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, max_limit.max(1)),
            cursor,
        }
    }

    /// First page of an ordering.
    pub fn first(limit: usize, max_limit: usize) -> Self {
        Self::new(limit, None, max_limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Request for the page following `page`, if there is one.
    pub fn next(&self, page: &Page<impl Sized>) -> Option<Self> {
        page.next_cursor.as_ref().map(|cursor| Self {
            limit: self.limit,
            cursor: Some(cursor.clone()),
        })
    }
}

// == Page ==
/// One page of results.
///
/// `has_more` is true exactly when `next_cursor` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}

// == Source Traits ==
/// An item that can name the position right after itself.
pub trait Cursored {
    fn cursor(&self) -> String;
}

/// An ordered, queryable data source.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Cursored + Send;
    type Error: Send;

    /// Returns up to `take` items strictly after `cursor` in the source's
    /// order, or from the start when `cursor` is `None`.
    ///
    /// A cursor whose item has since been deleted must not fail; the source
    /// resumes at the next item the ordering would have produced.
    async fn fetch_after(
        &self,
        cursor: Option<&str>,
        take: usize,
    ) -> Result<Vec<Self::Item>, Self::Error>;
}

// == Paginate ==
/// Fetches one page from `source`.
///
/// Asks for one item beyond `limit`: its presence proves another page exists.
/// Errors from the source are returned unchanged.
pub async fn paginate<S>(source: &S, request: &PageRequest) -> Result<Page<S::Item>, S::Error>
where
    S: PageSource + ?Sized,
{
    let limit = request.limit();
    let mut items = source
        .fetch_after(request.cursor(), limit.saturating_add(1))
        .await?;

    if items.len() > limit {
        items.truncate(limit);
        let next_cursor = items.last().map(Cursored::cursor);
        Ok(Page {
            has_more: next_cursor.is_some(),
            items,
            next_cursor,
        })
    } else {
        Ok(Page {
            items,
            next_cursor: None,
            has_more: false,
        })
    }
}

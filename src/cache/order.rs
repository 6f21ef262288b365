//! Insertion Order Module
//!
//! Tracks the order in which keys were written, for FIFO eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Remembers write order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = earliest inserted (next eviction candidate)
/// - Back = most recently inserted
///
/// Reads never reorder keys; only a fresh `record` moves a key to the back.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Marks a key as the most recent insertion.
    ///
    /// A key that is already tracked is moved to the back, so an overwrite
    /// counts as a new insertion.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the earliest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Keys in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> + '_ {
        self.order.iter()
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String) -> bool,
    {
        self.order.retain(keep);
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

//! Chat Cache - read-through caching and cursor pagination for a career-chat service
//!
//! Provides TTL caches with FIFO eviction, collision-free cache keys,
//! entity-driven invalidation and opaque-cursor pagination over chat data.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use service::ChatService;
pub use tasks::spawn_sweep_task;

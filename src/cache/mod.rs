//! Cache Module
//!
//! In-memory read-through caching with TTL expiration, FIFO eviction and
//! entity-driven invalidation.

mod aside;
mod entry;
mod invalidation;
mod lock;
mod order;
mod registry;
mod stats;
mod store;

pub mod keys;


// Re-export public types
pub use aside::with_cache;
pub use entry::CacheEntry;
pub use invalidation::Invalidator;
pub use keys::{CacheKey, CacheKeyBuilder, KeyParts};
pub use order::InsertionOrder;
pub use registry::CacheRegistry;
pub use stats::CacheStats;
pub use store::{CacheHandle, TtlCache};

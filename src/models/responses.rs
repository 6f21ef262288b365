//! Response DTOs for the chat API
//!
//! Records and pages are serialized as-is; these cover the remaining bodies.

use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;

/// Response body for DELETE /sessions/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The session that was deleted
    pub id: Uuid,
}

impl DeleteResponse {
    pub fn new(id: Uuid) -> Self {
        Self {
            message: format!("Session '{}' deleted successfully", id),
            id,
        }
    }
}

/// Counters of one cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsEntry {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStatsEntry {
    pub fn new(name: impl Into<String>, stats: &CacheStats) -> Self {
        Self {
            name: name.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub caches: Vec<CacheStatsEntry>,
}

impl StatsResponse {
    pub fn new(stats: Vec<(String, CacheStats)>) -> Self {
        Self {
            caches: stats
                .into_iter()
                .map(|(name, stats)| CacheStatsEntry::new(name, &stats))
                .collect(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

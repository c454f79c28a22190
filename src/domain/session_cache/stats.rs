//! Session cache statistics

use serde::{Deserialize, Serialize};

/// Aggregate view over every live session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sessions holding at least one cache entry or context turn
    pub total_sessions: usize,
    /// Cache entries summed across sessions
    pub total_cached_queries: usize,
    /// Context turns summed across sessions
    pub total_contexts: usize,
    pub cache_threshold: f32,
    pub max_session_cache_size: usize,
    pub max_context_length: usize,
    /// Lookups answered from cache since startup
    #[serde(default)]
    pub cache_hits: u64,
    /// Lookups that found nothing, including degraded ones
    #[serde(default)]
    pub cache_misses: u64,
    #[serde(default)]
    pub cache_evictions: u64,
    #[serde(default)]
    pub context_evictions: u64,
    #[serde(default)]
    pub embedding_failures: u64,
}

impl SessionStats {
    /// Fraction of lookups served from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;

        if total == 0 {
            return 0.0;
        }

        self.cache_hits as f64 / total as f64
    }
}

/// Read-only view of a single session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub cached_queries: usize,
    pub context_turns: usize,
    /// Cached questions, oldest first (eviction order)
    pub queries: Vec<String>,
}

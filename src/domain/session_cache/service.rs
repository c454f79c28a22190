//! Session cache service trait

use async_trait::async_trait;

use super::{CacheHit, SessionSnapshot, SessionStats};

/// Operations the routing/generation pipeline performs against the session cache.
///
/// Every method is infallible from the caller's point of view: failures are
/// logged and surface as the default value (a miss, a skipped write, the
/// unmodified query).
#[async_trait]
pub trait SessionCacheService: Send + Sync {
    /// Return the stored answer for a sufficiently similar earlier question
    async fn check_semantic_cache(&self, query: &str, session_id: &str) -> Option<String>;

    /// Like `check_semantic_cache`, but also report which question matched and how closely
    async fn check_semantic_cache_detailed(
        &self,
        query: &str,
        session_id: &str,
    ) -> Option<CacheHit>;

    async fn add_to_semantic_cache(&self, query: &str, response: &str, session_id: &str);

    async fn add_to_context(&self, session_id: &str, query: &str, response: &str);

    /// Prefix the query with the most recent turns of the conversation
    async fn get_context_for_query(&self, session_id: &str, query: &str) -> String;

    async fn get_session_stats(&self) -> SessionStats;

    async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot>;

    async fn clear_session_cache(&self, session_id: &str);

    async fn clear_all_caches(&self);
}

//! Session cache metrics
//!
//! Emitted through the `metrics` facade; the host process decides whether a
//! recorder (Prometheus or otherwise) is installed.

use metrics::counter;

/// Record a semantic cache lookup outcome
pub fn record_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("session_cache_lookups_total", "result" => result).increment(1);
}

/// Record an eviction from either the answer cache or the context history
pub fn record_eviction(store: &'static str) {
    counter!("session_cache_evictions_total", "store" => store).increment(1);
}

/// Record an embedding call that failed and degraded an operation
pub fn record_embedding_failure(operation: &'static str) {
    counter!("session_cache_embedding_failures_total", "operation" => operation).increment(1);
}

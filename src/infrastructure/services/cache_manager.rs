//! Session cache manager
//!
//! Facade over the per-session semantic cache and context history. Embeddings
//! are always computed before a session lock is taken; the lock only covers
//! the scan, insert and eviction steps.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::session_cache::{
    CacheEntry, CacheHit, ContextTurn, SessionCacheConfig, SessionCacheService, SessionSnapshot,
    SessionStats,
};
use crate::domain::DomainError;
use crate::infrastructure::metrics;
use crate::infrastructure::session_cache::SessionRegistry;

/// Owns every session's cache and context; shared across request handlers via `Arc`
pub struct CacheManager {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    registry: SessionRegistry,
    config: SessionCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    cache_evictions: AtomicU64,
    context_evictions: AtomicU64,
    embedding_failures: AtomicU64,
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("embedding_provider", &self.embedding_provider.provider_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(embedding_provider, SessionCacheConfig::default())
    }

    pub fn with_config(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: SessionCacheConfig,
    ) -> Self {
        Self {
            embedding_provider,
            registry: SessionRegistry::new(
                config.max_session_cache_size,
                config.max_context_length,
            ),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            cache_evictions: AtomicU64::new(0),
            context_evictions: AtomicU64::new(0),
            embedding_failures: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SessionCacheConfig {
        &self.config
    }

    /// Configured model, or the provider's default when none is set
    pub fn embedding_model(&self) -> &str {
        match self.config.embedding_model.as_str() {
            "" => self.embedding_provider.default_model(),
            model => model,
        }
    }

    /// Vector size the cache will store, when the provider knows the model.
    ///
    /// Fails when the configured size exceeds what the model produces.
    pub fn vector_dimensions(&self) -> Result<Option<usize>, DomainError> {
        let model = self.embedding_model();
        let native = self.embedding_provider.dimensions(model);

        match (self.config.embedding_dimensions, native) {
            (Some(requested), Some(native)) if requested > native => {
                Err(DomainError::configuration(format!(
                    "embedding_dimensions {} exceeds the {} dimensions of {}",
                    requested, native, model
                )))
            }
            (Some(requested), _) => Ok(Some(requested)),
            (None, native) => Ok(native),
        }
    }

    fn embedding_request(&self, text: &str) -> EmbeddingRequest {
        EmbeddingRequest::single(self.embedding_model(), text)
            .with_dimensions(self.config.embedding_dimensions)
    }

    /// Vectors with NaN or infinite components are rejected; they would
    /// compare as NaN against every entry
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let response = self
            .embedding_provider
            .embed(self.embedding_request(text))
            .await?;

        let vector = response
            .into_first_vector()
            .ok_or_else(|| DomainError::internal("No embedding returned"))?;

        if vector.is_empty() || vector.iter().any(|value| !value.is_finite()) {
            return Err(DomainError::provider(
                "embedding",
                "Embedding is empty or has non-finite components",
            ));
        }

        Ok(vector)
    }

    fn note_embedding_failure(
        &self,
        operation: &'static str,
        session_id: &str,
        error: &DomainError,
    ) {
        self.embedding_failures.fetch_add(1, Ordering::Relaxed);
        metrics::record_embedding_failure(operation);
        warn!(
            session_id,
            operation,
            error_kind = error.kind(),
            "Query embedding failed, skipping session cache: {}",
            error
        );
    }

    async fn try_lookup(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<Option<CacheHit>, DomainError> {
        let Some(handle) = self.registry.get(session_id).await else {
            return Ok(None);
        };

        if handle.lock().await.cache.is_empty() {
            return Ok(None);
        }

        let embedding = self.generate_embedding(query).await?;

        let state = handle.lock().await;
        Ok(state.cache.find_best(&embedding, self.config.similarity_threshold))
    }

    async fn try_insert(
        &self,
        query: &str,
        response: &str,
        session_id: &str,
    ) -> Result<usize, DomainError> {
        let embedding = self.generate_embedding(query).await?;

        let handle = self.registry.get_or_create(session_id).await;
        let mut state = handle.lock().await;
        let evicted = state.cache.insert(CacheEntry::new(query, response, embedding));
        let size = state.cache.len();
        drop(state);

        if let Some(evicted) = evicted {
            self.cache_evictions.fetch_add(1, Ordering::Relaxed);
            metrics::record_eviction("cache");
            debug!(session_id, evicted = evicted.query(), "Evicted oldest session cache entry");
        }

        Ok(size)
    }

    /// Look up an answer for a question similar to `query` in this session
    pub async fn check_semantic_cache(&self, query: &str, session_id: &str) -> Option<String> {
        self.check_semantic_cache_detailed(query, session_id)
            .await
            .map(|hit| hit.response)
    }

    pub async fn check_semantic_cache_detailed(
        &self,
        query: &str,
        session_id: &str,
    ) -> Option<CacheHit> {
        if session_id.is_empty() {
            return None;
        }

        let hit = match self.try_lookup(query, session_id).await {
            Ok(hit) => hit,
            Err(e) => {
                self.note_embedding_failure("lookup", session_id, &e);
                None
            }
        };

        match &hit {
            Some(hit) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                info!(
                    session_id,
                    similarity = hit.similarity,
                    "Session cache hit ({:.3})",
                    hit.similarity
                );
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(session_id, "Session cache miss");
            }
        }

        metrics::record_lookup(hit.is_some());

        hit
    }

    /// Store an answer; skipped entirely if the question cannot be embedded
    pub async fn add_to_semantic_cache(&self, query: &str, response: &str, session_id: &str) {
        if session_id.is_empty() {
            return;
        }

        match self.try_insert(query, response, session_id).await {
            Ok(size) => info!(session_id, size, "Added query to session cache"),
            Err(e) => self.note_embedding_failure("insert", session_id, &e),
        }
    }

    pub async fn add_to_context(&self, session_id: &str, query: &str, response: &str) {
        if session_id.is_empty() {
            return;
        }

        let handle = self.registry.get_or_create(session_id).await;
        let mut state = handle.lock().await;
        let dropped = state.context.append(ContextTurn::new(query, response));
        let length = state.context.len();
        drop(state);

        if dropped.is_some() {
            self.context_evictions.fetch_add(1, Ordering::Relaxed);
            metrics::record_eviction("context");
        }

        info!(session_id, length, "Added turn to session context");
    }

    /// Enrich `query` with the most recent turns of the session
    pub async fn get_context_for_query(&self, session_id: &str, query: &str) -> String {
        if session_id.is_empty() {
            return query.to_string();
        }

        let Some(handle) = self.registry.get(session_id).await else {
            return query.to_string();
        };

        let state = handle.lock().await;
        if state.context.is_empty() {
            return query.to_string();
        }

        let enhanced = state.context.build_enhanced_query(
            query,
            self.config.context_window_turns,
            self.config.response_preview_chars,
        );
        drop(state);

        info!(session_id, "Built context-enhanced query");

        enhanced
    }

    pub async fn get_session_stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            cache_threshold: self.config.similarity_threshold,
            max_session_cache_size: self.config.max_session_cache_size,
            max_context_length: self.config.max_context_length,
            cache_hits: self.hits.load(Ordering::Relaxed),
            cache_misses: self.misses.load(Ordering::Relaxed),
            cache_evictions: self.cache_evictions.load(Ordering::Relaxed),
            context_evictions: self.context_evictions.load(Ordering::Relaxed),
            embedding_failures: self.embedding_failures.load(Ordering::Relaxed),
            ..Default::default()
        };

        for (_, handle) in self.registry.handles().await {
            let state = handle.lock().await;

            if state.is_empty() {
                continue;
            }

            stats.total_sessions += 1;
            stats.total_cached_queries += state.cache.len();
            stats.total_contexts += state.context.len();
        }

        stats
    }

    pub async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let handle = self.registry.get(session_id).await?;
        let state = handle.lock().await;

        Some(SessionSnapshot {
            session_id: session_id.to_string(),
            cached_queries: state.cache.len(),
            context_turns: state.context.len(),
            queries: state.cache.queries().map(str::to_string).collect(),
        })
    }

    /// Forget everything about one session; unknown sessions are ignored
    pub async fn clear_session_cache(&self, session_id: &str) {
        if self.registry.remove(session_id).await {
            info!(session_id, "Cleared session cache");
        } else {
            debug!(session_id, "No session state to clear");
        }
    }

    pub async fn clear_all_caches(&self) {
        let cleared = self.registry.clear().await;
        info!(sessions = cleared, "Cleared all session caches");
    }
}

#[async_trait]
impl SessionCacheService for CacheManager {
    async fn check_semantic_cache(&self, query: &str, session_id: &str) -> Option<String> {
        CacheManager::check_semantic_cache(self, query, session_id).await
    }

    async fn check_semantic_cache_detailed(
        &self,
        query: &str,
        session_id: &str,
    ) -> Option<CacheHit> {
        CacheManager::check_semantic_cache_detailed(self, query, session_id).await
    }

    async fn add_to_semantic_cache(&self, query: &str, response: &str, session_id: &str) {
        CacheManager::add_to_semantic_cache(self, query, response, session_id).await
    }

    async fn add_to_context(&self, session_id: &str, query: &str, response: &str) {
        CacheManager::add_to_context(self, session_id, query, response).await
    }

    async fn get_context_for_query(&self, session_id: &str, query: &str) -> String {
        CacheManager::get_context_for_query(self, session_id, query).await
    }

    async fn get_session_stats(&self) -> SessionStats {
        CacheManager::get_session_stats(self).await
    }

    async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        CacheManager::session_snapshot(self, session_id).await
    }

    async fn clear_session_cache(&self, session_id: &str) {
        CacheManager::clear_session_cache(self, session_id).await
    }

    async fn clear_all_caches(&self) {
        CacheManager::clear_all_caches(self).await
    }
}

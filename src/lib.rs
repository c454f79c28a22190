//! Session cache
//!
//! Per-conversation semantic answer cache and rolling context history for
//! the cooking assistant's chat pipeline:
//! - Similarity lookup over previously answered questions
//! - Bounded FIFO storage per session
//! - Query enrichment from recent turns
//! - Pluggable embedding providers (OpenAI-compatible HTTP client included)

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use infrastructure::services::CacheManager;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use infrastructure::embedding::{HttpClient, OpenAiEmbeddingProvider};

/// Create a cache manager backed by the configured embedding endpoint
pub fn create_cache_manager(config: &AppConfig) -> anyhow::Result<Arc<CacheManager>> {
    config.session_cache.validate()?;

    let client = HttpClient::with_timeout(config.embedding.timeout())
        .context("Failed to build embedding HTTP client")?;
    let provider = OpenAiEmbeddingProvider::with_base_url(
        client,
        config.embedding.api_key.clone(),
        config.embedding.base_url.clone(),
    );

    let manager = CacheManager::with_config(Arc::new(provider), config.session_cache.clone());
    let dimensions = manager.vector_dimensions()?;

    info!(
        base_url = %config.embedding.base_url,
        model = manager.embedding_model(),
        dimensions = ?dimensions,
        threshold = config.session_cache.similarity_threshold,
        "Session cache initialized"
    );

    Ok(Arc::new(manager))
}

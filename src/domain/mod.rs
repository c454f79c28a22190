//! Domain layer - Core entities, traits and errors

pub mod embedding;
pub mod error;
pub mod session_cache;

pub use embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use session_cache::{
    CacheEntry, CacheHit, ContextTurn, SessionCacheConfig, SessionCacheService, SessionSnapshot,
    SessionStats,
};

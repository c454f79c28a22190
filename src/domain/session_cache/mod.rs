//! Session-scoped semantic cache and conversation context models
//!
//! Each conversation gets its own bounded cache of answered questions, matched
//! by embedding similarity, and a bounded history of turns used to enrich the
//! next question before routing.

mod config;
mod entry;
mod service;
mod stats;

pub use config::SessionCacheConfig;
pub use entry::{CacheEntry, CacheHit, ContextTurn};
pub use service::SessionCacheService;
pub use stats::{SessionSnapshot, SessionStats};

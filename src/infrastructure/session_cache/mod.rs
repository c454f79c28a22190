//! In-memory session cache stores

mod context_store;
mod registry;
mod semantic_store;

pub use context_store::ContextStore;
pub use registry::{SessionHandle, SessionRegistry, SessionState};
pub use semantic_store::SemanticCacheStore;

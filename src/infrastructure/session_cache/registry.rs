//! Registry of live sessions
//!
//! The outer lock only guards the id -> handle map. All work on a session's
//! entries and turns happens under that session's own mutex, so different
//! sessions never contend beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::{ContextStore, SemanticCacheStore};

/// Everything the cache keeps for one conversation
#[derive(Debug)]
pub struct SessionState {
    pub cache: SemanticCacheStore,
    pub context: ContextStore,
}

impl SessionState {
    pub fn new(max_entries: usize, max_turns: usize) -> Self {
        Self {
            cache: SemanticCacheStore::new(max_entries),
            context: ContextStore::new(max_turns),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty() && self.context.is_empty()
    }
}

pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_entries: usize,
    max_turns: usize,
}

impl SessionRegistry {
    pub fn new(max_entries: usize, max_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_entries,
            max_turns,
        }
    }

    /// Handle for an existing session; never creates one
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.get(session_id).await {
            return handle;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SessionState::new(self.max_entries, self.max_turns)))
            })
            .clone()
    }

    /// Drop a session and everything it holds. Returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drop every session, returning how many there were
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        count
    }

    /// Snapshot of the current handles, taken without holding any session lock
    pub async fn handles(&self) -> Vec<(String, SessionHandle)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

//! In-Memory Session Store Adapter
//!
//! Keeps live sessions in a map. Sessions are abandoned by removing them;
//! nothing else needs cleaning up.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{SessionId, StorageError, TriageError};
use crate::domain::triage::TriageSession;
use crate::ports::{SessionStore, SharedSession};

/// In-memory storage for live sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SharedSession>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: TriageSession) -> Result<SharedSession, TriageError> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(*session.id()) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateSession(*entry.key()).into()),
            Entry::Vacant(entry) => {
                let shared = Arc::new(Mutex::new(session));
                entry.insert(Arc::clone(&shared));
                Ok(shared)
            }
        }
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SharedSession>, TriageError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, TriageError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}

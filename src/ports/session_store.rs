//! Session store port.
//!
//! Holds live triage sessions between requests. Each session sits behind its
//! own async mutex so answers to one session apply strictly in sequence while
//! different sessions proceed independently.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::{SessionId, TriageError};
use crate::domain::triage::TriageSession;

/// A session guarded for sequential mutation.
pub type SharedSession = Arc<Mutex<TriageSession>>;

/// Port for keeping live sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and returns its shared handle.
    ///
    /// # Errors
    ///
    /// - `StorageError::DuplicateSession` if the id is already present
    async fn insert(&self, session: TriageSession) -> Result<SharedSession, TriageError>;

    /// Finds a session by id.
    ///
    /// Returns `None` if not found.
    async fn get(&self, id: &SessionId) -> Result<Option<SharedSession>, TriageError>;

    /// Removes a session. Returns true if it existed.
    async fn remove(&self, id: &SessionId) -> Result<bool, TriageError>;
}

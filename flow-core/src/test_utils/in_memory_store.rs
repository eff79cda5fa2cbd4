//! InMemorySessionStore — HashMap-backed SessionStore for testing.

use crate::error::StoreError;
use crate::id::SessionId;
use crate::session::Session;
use crate::store::SessionStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// A trivial, lock-guarded `HashMap` session store. Not the crate's default
/// production store (see `flow-state-memory::MemoryStore` for that, which
/// uses `tokio::sync::RwLock` so it doesn't block an async executor's
/// threads) — this one exists so `flow-core` and its downstream crates can
/// write tests without depending on `flow-state-memory`.
pub struct InMemorySessionStore {
    data: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::Other(e.to_string().into()))?;
        Ok(data.get(id).cloned())
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        data.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        data.remove(id);
        Ok(())
    }
}

#![deny(missing_docs)]
//! In-memory implementation of `flow-core`'s `SessionStore` trait.
//!
//! Uses a `HashMap` behind a `tokio::sync::RwLock` for concurrent access.
//! This is the runtime's default store — suitable for single-process
//! deployments and tests; horizontal scale requires an external store (see
//! `flow-state-fs` for a filesystem-backed alternative, or implement
//! `SessionStore` against a shared key-value backend).

use async_trait::async_trait;
use flow_core::error::StoreError;
use flow_core::id::SessionId;
use flow_core::session::Session;
use flow_core::store::SessionStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory session store backed by a `HashMap` behind a `RwLock`.
///
/// `set` replaces the prior value for an id atomically with respect to
/// concurrent `get`s, satisfying the store contract's ordering requirement.
pub struct MemoryStore {
    data: RwLock<HashMap<SessionId, Session>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let data = self.data.read().await;
        Ok(data.get(id).cloned())
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flow_core::{FlowId, NodeId, SessionStatus};
    use std::collections::HashMap as StdHashMap;

    fn sample_session(id: &str) -> Session {
        Session {
            id: SessionId::from(id),
            flow_id: FlowId::from("flow-1"),
            current_node_id: NodeId::from("start"),
            variables: StdHashMap::new(),
            history: vec![],
            status: SessionStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = MemoryStore::new();
        let result = store.get(&SessionId::from("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        let session = sample_session("s1");
        store.set(&session).await.unwrap();
        let loaded = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.current_node_id, session.current_node_id);
    }

    #[tokio::test]
    async fn set_replaces_prior_value() {
        let store = MemoryStore::new();
        let mut session = sample_session("s1");
        store.set(&session).await.unwrap();
        session.current_node_id = NodeId::from("next");
        store.set(&session).await.unwrap();
        let loaded = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_node_id, NodeId::from("next"));
    }

    #[tokio::test]
    async fn delete_removes_the_session() {
        let store = MemoryStore::new();
        let session = sample_session("s1");
        store.set(&session).await.unwrap();
        store.delete(&session.id).await.unwrap();
        assert!(store.get(&session.id).await.unwrap().is_none());
    }
}

#![deny(missing_docs)]
//! Filesystem-backed implementation of `flow-core`'s `SessionStore` trait.
//!
//! Each session is a single URL-encoded `.json` file directly under the
//! root directory — the "external (e.g. key-value)" store example the
//! runtime's session-store component calls for, backed by a real
//! process-restart-surviving filesystem rather than an in-memory map.

use async_trait::async_trait;
use flow_core::error::StoreError;
use flow_core::id::SessionId;
use flow_core::session::Session;
use flow_core::store::SessionStore;
use std::path::{Path, PathBuf};

/// Filesystem-backed session store.
///
/// Directory layout:
/// ```text
/// root/
///   <url-encoded-session-id>.json
/// ```
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a new filesystem store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

/// Encode a session id into a safe filename.
fn id_to_filename(id: &SessionId) -> String {
    let mut encoded = String::new();
    for ch in id.as_str().chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => encoded.push(ch),
            _ => {
                for byte in ch.to_string().as_bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    format!("{encoded}.json")
}

#[async_trait]
impl SessionStore for FsStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let path = self.root.join(id_to_filename(id));
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let session: Session = serde_json::from_str(&contents)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::WriteFailed(e.to_string())),
        }
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let path = self.root.join(id_to_filename(&session.id));
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let path = self.root.join(id_to_filename(id));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flow_core::{FlowId, NodeId, SessionStatus};
    use std::collections::HashMap;

    fn sample_session(id: &str) -> Session {
        Session {
            id: SessionId::from(id),
            flow_id: FlowId::from("flow-1"),
            current_node_id: NodeId::from("start"),
            variables: HashMap::new(),
            history: vec![],
            status: SessionStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            metadata: None,
        }
    }

    #[test]
    fn id_encoding_handles_unsafe_characters() {
        let id = SessionId::from("user:123/session one");
        let filename = id_to_filename(&id);
        assert!(filename.ends_with(".json"));
        assert!(!filename.contains(':'));
        assert!(!filename.contains('/'));
        assert!(!filename.contains(' '));
    }

    #[tokio::test]
    async fn write_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let session = sample_session("s1");

        store.set(&session).await.unwrap();
        let loaded = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.current_node_id, session.current_node_id);
    }

    #[tokio::test]
    async fn read_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let val = store.get(&SessionId::from("missing")).await.unwrap();
        assert!(val.is_none());
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let session = sample_session("s1");

        store.set(&session).await.unwrap();
        store.delete(&session.id).await.unwrap();
        assert!(store.get(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_nonexistent_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let result = store.delete(&SessionId::from("missing")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn set_replaces_prior_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let mut session = sample_session("s1");

        store.set(&session).await.unwrap();
        session.current_node_id = NodeId::from("next");
        store.set(&session).await.unwrap();

        let loaded = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_node_id, NodeId::from("next"));
    }
}

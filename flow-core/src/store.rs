//! The session store contract — §4.2.

use crate::error::StoreError;
use crate::id::SessionId;
use crate::session::Session;
use async_trait::async_trait;

/// How sessions persist and are retrieved across turns.
///
/// Deliberately minimal: get/set/delete by id, nothing more. A session is
/// looked up only by its own id, never searched or listed, so this trait
/// carries no `list`/`search` surface the way `flow-core`'s teacher's
/// broader state-store protocol does.
///
/// Implementations MUST treat `set` as a full-replacement write that is
/// atomic with respect to concurrent `get`s of the same id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session by id. Returns `None` if it doesn't exist.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Write a session, replacing any prior value for the same id.
    async fn set(&self, session: &Session) -> Result<(), StoreError>;

    /// Delete a session. A no-op if the id doesn't exist.
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
}

//! Errors the engine itself raises, distinct from the wire-visible
//! [`flow_core::FlowError`] a session carries once the run loop has started —
//! these are raised before or around a run, at the public-surface boundary
//! (`start_session`/`process_input`/`get_session`/`end_session`).

use flow_core::{ErrorCode, FlowError, StoreError};
use thiserror::Error;

/// Errors from the engine's public surface.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// `flow.entry_node` does not reference a node in the flow.
    #[error("entry node {0} not found in flow")]
    EntryNotFound(String),

    /// `process_input`/`get_session`/`end_session` referenced an id with no
    /// stored session.
    #[error("session {0} not found")]
    SessionNotFound(String),

    /// `process_input` called on a session whose status isn't
    /// `WaitingInput`.
    #[error("session {0} is not waiting for input")]
    SessionNotWaiting(String),

    /// The session store raised.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// The wire-visible `{code, message}` pair for this error, per the
    /// external interface's error-reporting shape.
    pub fn to_flow_error(&self) -> FlowError {
        let code = match self {
            EngineError::EntryNotFound(_) => ErrorCode::EntryNotFound,
            EngineError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            EngineError::SessionNotWaiting(_) => ErrorCode::SessionNotWaiting,
            EngineError::Store(_) => ErrorCode::ExecutionError,
        };
        FlowError::new(code, self.to_string())
    }
}

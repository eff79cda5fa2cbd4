//! Error vocabulary: the wire-visible [`FlowError`]/[`ErrorCode`] pair node
//! handlers and the engine attach to sessions, and the internal
//! [`StoreError`] a [`crate::store::SessionStore`] implementation raises.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The uppercase snake-case error codes defined by the core. Node handlers
/// and the engine attach one of these to every [`FlowError`] they produce;
/// external callers match on `code`, not on `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// `Flow::entry_node` does not reference a node in the flow.
    EntryNotFound,
    /// A referenced node id does not exist in the flow.
    NodeNotFound,
    /// `get_session`/`process_input` referenced an id with no stored session.
    SessionNotFound,
    /// `process_input` called on a session whose status isn't `WaitingInput`.
    SessionNotWaiting,
    /// The run loop's step bound (Invariant I6) was reached.
    MaxStepsExceeded,
    /// Collect-Input's retry policy was exhausted.
    MaxRetriesExceeded,
    /// LLM-Router could not resolve an intent to a target node.
    IntentNotFound,
    /// A Tool-Call failed with no error-handling policy configured.
    ToolCallFailed,
    /// A Tool-Call's error-handling policy itself could not be satisfied
    /// (e.g. `Goto` with a dangling target).
    ToolCallError,
    /// The executor could not find a handler for a node's kind.
    UnknownNodeType,
    /// A handler raised instead of returning a `NodeResult`.
    ExecutionError,
}

impl ErrorCode {
    /// The exact wire string for this code, per the runtime's external
    /// interface (`{code, message, details?}`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EntryNotFound => "ENTRY_NOT_FOUND",
            ErrorCode::NodeNotFound => "NODE_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::SessionNotWaiting => "SESSION_NOT_WAITING",
            ErrorCode::MaxStepsExceeded => "MAX_STEPS_EXCEEDED",
            ErrorCode::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            ErrorCode::IntentNotFound => "INTENT_NOT_FOUND",
            ErrorCode::ToolCallFailed => "TOOL_CALL_FAILED",
            ErrorCode::ToolCallError => "TOOL_CALL_ERROR",
            ErrorCode::UnknownNodeType => "UNKNOWN_NODE_TYPE",
            ErrorCode::ExecutionError => "EXECUTION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured, wire-shaped error: `{code, message, details?}`. Attached to
/// `NodeResult::error` and, once applied by the engine, to
/// `ExecutionStep::error`.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct FlowError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable message. Not matched on by callers.
    pub message: String,
    /// Optional structured detail payload.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl FlowError {
    /// Construct an error with no details payload.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errors raised by a [`crate::store::SessionStore`] implementation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested session id has no stored session.
    #[error("session not found: {0}")]
    NotFound(String),

    /// The write could not be completed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The stored payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all for backend-specific failures.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised by a service contract implementation
/// ([`crate::services::AiService`], [`crate::services::KnowledgeService`],
/// [`crate::services::ToolService`]).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The call could not be completed, but might succeed on retry.
    #[error("retryable: {0}")]
    Retryable(String),

    /// The call failed in a way retrying will not fix.
    #[error("non-retryable: {0}")]
    NonRetryable(String),

    /// The call exceeded its timeout.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// Catch-all for backend-specific failures.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    /// Whether a caller might reasonably retry this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Retryable(_) | ServiceError::Timeout(_))
    }
}

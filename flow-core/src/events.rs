//! Event vocabulary — §4.7. Not a trait; a shared vocabulary every subscriber
//! consumes through whatever mechanism `flow-events::EventBus` provides.
//! Mirrors the teacher's `layer0::lifecycle` module, which documents the
//! same "events are data, dispatch is someone else's job" split.

use crate::error::FlowError;
use crate::id::{FlowId, NodeId, SessionId};
use crate::node::NodeKind;
use crate::session::SessionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The runtime's lifecycle event taxonomy, emitted in strict happens-before
/// order within a single run-loop invocation. Across sessions, no ordering
/// is guaranteed.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new session began executing.
    SessionStarted {
        /// The session.
        session_id: SessionId,
        /// The flow it runs.
        flow_id: FlowId,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// The run loop is about to invoke a node's handler.
    NodeStarted {
        /// The session.
        session_id: SessionId,
        /// The node about to run.
        node_id: NodeId,
        /// Its kind.
        node_kind: NodeKind,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A node's handler completed without error.
    NodeCompleted {
        /// The session.
        session_id: SessionId,
        /// The node that ran.
        node_id: NodeId,
        /// Its kind.
        node_kind: NodeKind,
        /// How long the invocation took.
        duration_ms: u64,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A node's handler (or the executor wrapping it) produced an error.
    NodeError {
        /// The session.
        session_id: SessionId,
        /// The node that failed.
        node_id: NodeId,
        /// Its kind.
        node_kind: NodeKind,
        /// The error.
        error: FlowError,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A handler produced a user-visible message.
    MessageSent {
        /// The session.
        session_id: SessionId,
        /// The node that produced it.
        node_id: NodeId,
        /// The message text.
        message: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// `process_input` accepted a new input for a waiting session.
    InputReceived {
        /// The session.
        session_id: SessionId,
        /// The raw input text.
        input: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A session reached a terminal status other than `Escalated`.
    SessionCompleted {
        /// The session.
        session_id: SessionId,
        /// The final status.
        status: SessionStatus,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A session reached an Escalate node.
    SessionEscalated {
        /// The session.
        session_id: SessionId,
        /// The escalation reason.
        reason: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// The session this event pertains to.
    pub fn session_id(&self) -> &SessionId {
        match self {
            Event::SessionStarted { session_id, .. }
            | Event::NodeStarted { session_id, .. }
            | Event::NodeCompleted { session_id, .. }
            | Event::NodeError { session_id, .. }
            | Event::MessageSent { session_id, .. }
            | Event::InputReceived { session_id, .. }
            | Event::SessionCompleted { session_id, .. }
            | Event::SessionEscalated { session_id, .. } => session_id,
        }
    }
}

/// A subscriber to the event bus. Implementations MUST be fast and
/// non-throwing in spirit: an error returned here is logged and the dispatch
/// continues to the next subscriber (see `flow-events::EventBus`), it never
/// aborts the run loop.
#[async_trait::async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Handle one event. Errors are caught and logged by the bus, never
    /// propagated to the engine.
    async fn on_event(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

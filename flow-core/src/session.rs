//! The session — mutable execution state for one user's run through a flow.
//!
//! The runtime keeps no call stack to resume: everything the next turn needs
//! lives in `Session::variables`, `current_node_id`, and `status`. A paused
//! session is simply a session whose status is `WaitingInput`; resuming it is
//! an ordinary `process_input` call against the stored value.

use crate::flow::VariablePatch;
use crate::id::{FlowId, NodeId, SessionId};
use crate::node::NodeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The mutable execution state of one user's progress through a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique id.
    pub id: SessionId,
    /// The flow being executed.
    pub flow_id: FlowId,
    /// The node the next run loop iteration will execute.
    pub current_node_id: NodeId,
    /// Session-scoped variables, of any of the five declared types.
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    /// Append-only audit history. Never removed, reordered, or rewritten
    /// after append (Invariant I3).
    #[serde(default)]
    pub history: Vec<ExecutionStep>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Free-form metadata, opaque to the runtime.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Session {
    /// Apply a variable patch: a shallow overwrite keyed by name (Invariant I4).
    pub fn apply_patch(&mut self, patch: &VariablePatch) {
        for (k, v) in patch {
            self.variables.insert(k.clone(), v.clone());
        }
    }

    /// Whether the session has reached a status from which no further
    /// execution may occur (Invariant I5). Extended beyond the invariant's
    /// literal three statuses to cover every status an End node may assign
    /// (`Abandoned`) and the caller-driven `Timeout`, since none of these
    /// are meaningfully resumable either — see `SPEC_FULL.md` §11.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Completed
                | SessionStatus::Escalated
                | SessionStatus::Error
                | SessionStatus::Abandoned
                | SessionStatus::Timeout
        )
    }
}

/// The session's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// A run loop is progressing, or may be resumed without new input.
    Active,
    /// Paused at a Collect-Input node; `process_input` is required to resume.
    WaitingInput,
    /// Terminated normally.
    Completed,
    /// Terminated via an Escalate node.
    Escalated,
    /// Terminated by a fatal error.
    Error,
    /// Terminated by an external timeout signal.
    Timeout,
    /// The user left without completing the flow, assigned by an End node
    /// whose `config.status` is `EndStatus::Abandoned`.
    Abandoned,
}

/// One entry in a session's audit history: a single handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStep {
    /// Unique id within the session, monotonically assigned.
    pub step_id: u64,
    /// The node this step executed.
    pub node_id: NodeId,
    /// The node's kind, denormalized for cheap history inspection.
    pub node_kind: NodeKind,
    /// When the step began.
    pub timestamp: DateTime<Utc>,
    /// The input passed to the handler, if any (only set on the resuming call
    /// of a Collect-Input node).
    #[serde(default)]
    pub input: Option<String>,
    /// The handler's opaque output payload, if any.
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    /// Wall-clock duration of the handler invocation, in milliseconds.
    pub duration_ms: u64,
    /// The structured error, if the handler (or the executor wrapping it)
    /// produced one.
    #[serde(default)]
    pub error: Option<crate::error::FlowError>,
}

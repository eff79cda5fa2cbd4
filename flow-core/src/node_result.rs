//! [`NodeResult`] — the value every node handler produces, applied by the
//! engine as the sole means of mutating session state (§4.4).
//!
//! Handlers are pure functions of `(node, session, input, services)`. They
//! never mutate the session directly; the engine applies the returned
//! `NodeResult` to it. This mirrors the teacher's effect-based handler
//! shape: declare what should happen, let the surrounding loop make it so.

use crate::flow::VariablePatch;
use crate::id::NodeId;
use crate::session::SessionStatus;
use serde::{Deserialize, Serialize};

/// The outcome of one handler invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeResult {
    /// Text to surface to the user.
    #[serde(default)]
    pub message: Option<String>,
    /// Opaque log data recorded in the step's history entry. Also consulted
    /// by the engine (§4.6 step 10) to match an outgoing edge's
    /// `source_handle`/`label` when no explicit `next_node_id` is given.
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    /// A patch applied to session variables: a shallow overwrite keyed by
    /// name (Invariant I4).
    #[serde(default)]
    pub variables: VariablePatch,
    /// An explicit next node, overriding edge-based routing. `None` means
    /// "follow the graph" — the engine falls back to matching or unique
    /// outgoing edges. This collapses the wire format's three-way
    /// `nextNodeId` (absent / explicit / null-for-pause) into a plain
    /// `Option`, since the "pause" case is always accompanied by
    /// `wait_for_input = true` in every handler that produces it — see
    /// `SPEC_FULL.md` §11.
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
    /// When true, the engine sets `status = WaitingInput` and returns
    /// without choosing a next node.
    #[serde(default)]
    pub wait_for_input: bool,
    /// When present, the engine terminates the session with this status
    /// instead of continuing the run loop. Escalate always supplies
    /// `Escalated`; End supplies its own `config.status`.
    #[serde(default)]
    pub end: Option<SessionStatus>,
    /// A structured error. Fatal by default — see §7 of `SPEC_FULL.md` for
    /// the propagation policy.
    #[serde(default)]
    pub error: Option<crate::error::FlowError>,
}

impl NodeResult {
    /// A result with no side effects, continuing to the next node.
    pub fn continue_silently() -> Self {
        Self::default()
    }

    /// A result carrying just a message, continuing to the next node.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }

    /// A result that pauses the session for input, optionally with a prompt.
    pub fn wait_for_input(message: Option<String>) -> Self {
        Self {
            message,
            wait_for_input: true,
            ..Self::default()
        }
    }

    /// A result carrying a fatal error.
    pub fn fatal(error: crate::error::FlowError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Attach a variable patch, builder-style.
    pub fn with_variables(mut self, patch: VariablePatch) -> Self {
        self.variables = patch;
        self
    }

    /// Attach an explicit next-node override, builder-style.
    pub fn with_next_node(mut self, id: NodeId) -> Self {
        self.next_node_id = Some(id);
        self
    }

    /// Attach an output payload, builder-style.
    pub fn with_output(mut self, output: serde_json::Value) -> Self {
        self.output = Some(output);
        self
    }

    /// Mark the session terminal with the given status, builder-style.
    pub fn with_end(mut self, status: SessionStatus) -> Self {
        self.end = Some(status);
        self
    }
}

/// Extract the routing hint from a handler's `output`, if any, for matching
/// against an edge's `source_handle`/`label` (§4.6 step 10).
///
/// Recognised shapes: a bare string output, or an object with a `"handle"`
/// string field.
pub fn output_hint(output: &serde_json::Value) -> Option<&str> {
    match output {
        serde_json::Value::String(s) => Some(s.as_str()),
        serde_json::Value::Object(map) => map.get("handle").and_then(|v| v.as_str()),
        _ => None,
    }
}

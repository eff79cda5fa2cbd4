//! The flow definition — an immutable, shared graph of nodes and edges.

use crate::id::{EdgeId, FlowId, NodeId};
use crate::node::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A declarative conversational flow. Immutable for the lifetime of any
/// session executing it; shared read-only across concurrent sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    /// Wire-format version. Must equal `"1.0"`.
    pub version: String,
    /// Unique id.
    pub id: FlowId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Id of the node execution begins at.
    pub entry_node: NodeId,
    /// Nodes keyed by id. Ordered for stable serialization; ids unique.
    pub nodes: Vec<Node>,
    /// Directed edges between nodes. Ids unique.
    pub edges: Vec<Edge>,
    /// Declared variables and their defaults.
    #[serde(default)]
    pub variables: Vec<VariableDeclaration>,
    /// Tools consumable by Tool-Call nodes via `tool_id`.
    #[serde(default)]
    pub tools: Vec<ToolDeclaration>,
    /// Authoring metadata, opaque to the runtime.
    #[serde(default)]
    pub metadata: Option<FlowMetadata>,
}

impl Flow {
    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Outgoing edges from a node, in declared order.
    pub fn outgoing_edges(&self, from: &NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| &e.source == from)
    }
}

/// A directed connection from one node to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique id.
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Optional source handle, matched against a handler's output hint.
    #[serde(default)]
    pub source_handle: Option<String>,
    /// Optional target handle, carried through but not interpreted by the core.
    #[serde(default)]
    pub target_handle: Option<String>,
    /// Optional display label, also matched against a handler's output hint.
    #[serde(default)]
    pub label: Option<String>,
    /// Optional authoring-time condition expression, opaque to the core.
    #[serde(default)]
    pub condition: Option<String>,
}

/// The five variable types a flow may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// UTF-8 text.
    String,
    /// A number (integer or float).
    Number,
    /// A boolean.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

/// A declared session variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// Variable name, used as the key in `Session::variables`.
    pub name: String,
    /// Declared type. Not enforced at runtime beyond seeding the default.
    #[serde(rename = "type")]
    pub kind: VariableType,
    /// Initial value applied at `start_session`, before Start's `init_variables`.
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    /// Whether the variable should survive across sessions. Not interpreted by
    /// this core; a host storing sessions externally may honor it.
    #[serde(default)]
    pub persistent: bool,
}

/// A tool declaration consumed by Tool-Call nodes via `tool_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Unique id, matched against `ToolCallConfig::tool_id`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description, opaque to the core.
    #[serde(default)]
    pub description: Option<String>,
}

/// Authoring metadata carried through, not interpreted by the runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowMetadata {
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Authoring user, if tracked.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Delivery channel the flow targets (e.g. `"sms"`, `"web"`), opaque here.
    #[serde(default)]
    pub channel: Option<String>,
}

/// A serde-friendly alias for a variable patch: a shallow overwrite keyed by
/// variable name, per Invariant I4.
pub type VariablePatch = HashMap<String, serde_json::Value>;

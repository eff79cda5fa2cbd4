//! The node data model — a closed set of nine tagged-union node kinds.
//!
//! The node set is closed by design: every kind is modeled as a variant
//! discriminated by `type`, dispatched by an exhaustive match. No virtual
//! dispatch over this enum is needed; extensibility lives one layer up, in
//! the handler registry that maps [`NodeKind`] to a handler implementation.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single step in a flow. Shared fields plus a per-kind config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique within the owning flow.
    pub id: NodeId,
    /// Human-readable label, not interpreted by the runtime.
    pub name: String,
    /// Editor position; carried through for round-tripping, unused at runtime.
    #[serde(default)]
    pub position: Option<Position>,
    /// The per-kind configuration.
    #[serde(flatten)]
    pub config: NodeConfig,
}

impl Node {
    /// The discriminator of this node, independent of its config payload.
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }
}

/// Editor canvas coordinates. Opaque to the runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// The node-kind discriminator, independent of the node's payload.
///
/// Used as the key into the handler registry (`flow-handlers::HandlerRegistry`)
/// — a direct map lookup, not a virtual call through the [`Node`] enum itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point of a flow.
    Start,
    /// Emits a templated message.
    Message,
    /// Prompts for and validates user input.
    CollectInput,
    /// Classifies user intent via the AI service.
    LlmRouter,
    /// Queries the knowledge service.
    KnowledgeSearch,
    /// Invokes the tool service.
    ToolCall,
    /// Branches on variable comparisons.
    Condition,
    /// Terminates the session for human handoff.
    Escalate,
    /// Terminates the session.
    End,
}

/// The node's kind-specific configuration. The `type` field is the wire
/// discriminator named in the runtime's external interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
    /// See [`StartConfig`].
    Start(StartConfig),
    /// See [`MessageConfig`].
    Message(MessageConfig),
    /// See [`CollectInputConfig`].
    CollectInput(CollectInputConfig),
    /// See [`LlmRouterConfig`].
    LlmRouter(LlmRouterConfig),
    /// See [`KnowledgeSearchConfig`].
    KnowledgeSearch(KnowledgeSearchConfig),
    /// See [`ToolCallConfig`].
    ToolCall(ToolCallConfig),
    /// See [`ConditionConfig`].
    Condition(ConditionConfig),
    /// See [`EscalateConfig`].
    Escalate(EscalateConfig),
    /// See [`EndConfig`].
    End(EndConfig),
}

impl NodeConfig {
    /// The discriminator matching this config's variant.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Start(_) => NodeKind::Start,
            NodeConfig::Message(_) => NodeKind::Message,
            NodeConfig::CollectInput(_) => NodeKind::CollectInput,
            NodeConfig::LlmRouter(_) => NodeKind::LlmRouter,
            NodeConfig::KnowledgeSearch(_) => NodeKind::KnowledgeSearch,
            NodeConfig::ToolCall(_) => NodeKind::ToolCall,
            NodeConfig::Condition(_) => NodeKind::Condition,
            NodeConfig::Escalate(_) => NodeKind::Escalate,
            NodeConfig::End(_) => NodeKind::End,
        }
    }
}

/// Config for [`NodeKind::Start`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartConfig {
    /// Interpolated and emitted on entry, if present.
    #[serde(default)]
    pub welcome_message: Option<String>,
    /// Merged into session variables on entry.
    #[serde(default)]
    pub init_variables: HashMap<String, serde_json::Value>,
}

/// Config for [`NodeKind::Message`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Interpolation template.
    pub message: String,
    /// Milliseconds to suspend before emitting. Must be non-negative.
    #[serde(default)]
    pub delay: Option<u64>,
}

/// Config for [`NodeKind::CollectInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectInputConfig {
    /// Interpolated prompt emitted when the node is first entered.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Session variable name the collected input is written to.
    pub variable_name: String,
    /// Validation policy, if any.
    #[serde(default)]
    pub validation: Option<ValidationConfig>,
    /// Retry policy on validation failure.
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
    /// Caller-enforced input timeout.
    #[serde(default)]
    pub timeout: Option<CollectInputTimeout>,
}

/// Validation applied to collected input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// The validator to apply.
    #[serde(rename = "type")]
    pub kind: ValidationKind,
    /// Minimum length (`text`) or value (`number`).
    #[serde(default)]
    pub min: Option<f64>,
    /// Maximum length (`text`) or value (`number`).
    #[serde(default)]
    pub max: Option<f64>,
    /// Pattern for `ValidationKind::Regex`.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Message emitted on failure when no retry policy is configured.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// The validator applied to collected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Length bounds on the raw string.
    Text,
    /// Parseable as a number, with optional min/max.
    Number,
    /// Matches a simple email pattern.
    Email,
    /// Matches a simple phone pattern.
    Phone,
    /// Matches `pattern` (empty pattern is always valid).
    Regex,
    /// Pass-through; implementations may accept all input.
    Date,
    /// Pass-through; implementations may accept all input.
    Custom,
}

/// Retry policy for Collect-Input validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum invalid attempts before the session becomes a fatal error.
    pub max_attempts: u32,
    /// Message emitted on each retryable failure.
    pub retry_message: String,
}

/// Caller-enforced timeout policy for Collect-Input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectInputTimeout {
    /// Seconds the caller waits before treating the prompt as timed out.
    pub seconds: u64,
    /// Node to route to on timeout, if the caller signals one.
    #[serde(default)]
    pub timeout_node_id: Option<NodeId>,
}

/// Config for [`NodeKind::LlmRouter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRouterConfig {
    /// System prompt passed to `AiService::classify`.
    pub system_prompt: String,
    /// Candidate intents.
    pub intents: Vec<IntentDeclaration>,
    /// Model selection hints, opaque to the core.
    #[serde(default)]
    pub model: Option<ModelConfig>,
    /// Intent name to route to when confidence is too low or classification fails.
    #[serde(default)]
    pub fallback_intent: Option<String>,
    /// Minimum confidence to accept the returned intent as-is. Default 0.5.
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
}

/// One candidate intent for an [`LlmRouterConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDeclaration {
    /// Unique name within the node.
    pub name: String,
    /// Description passed to the AI service for classification.
    pub description: String,
    /// Optional few-shot examples, passed through to the AI service.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Node to route to when this intent matches.
    pub target_node_id: NodeId,
}

/// Opaque model-selection hints for an AI service call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider name. The literal value `"rules"` has special meaning in the
    /// LLM-Router fallback policy (see `flow-handlers::handlers::llm_router`).
    pub provider: String,
    /// Model name, provider-specific.
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature, provider-specific.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Max output tokens, provider-specific.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Config for [`NodeKind::KnowledgeSearch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSearchConfig {
    /// Knowledge base to query.
    pub knowledge_base_id: String,
    /// Interpolation template for the query text.
    pub query: String,
    /// Max results requested. Default 3.
    #[serde(default)]
    pub top_k: Option<u32>,
    /// Minimum relevance score requested. Default 0.5.
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Session variable the result is written to.
    pub result_variable: String,
    /// When true, ungrounded results are replaced with a canonical "not found".
    #[serde(default)]
    pub grounded_only: bool,
}

/// Config for [`NodeKind::ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallConfig {
    /// Tool to invoke, declared in `Flow::tools`.
    pub tool_id: String,
    /// Input mapping; string values are interpolated, others pass through.
    #[serde(default)]
    pub inputs: HashMap<String, serde_json::Value>,
    /// Session variable the result is written to.
    pub result_variable: String,
    /// Seconds before the tool call is considered failed.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Retry policy for the `onError.action = "retry"` case.
    #[serde(default)]
    pub retry: Option<ToolRetryPolicy>,
    /// Error handling policy. Absent means any failure is fatal.
    #[serde(default)]
    pub on_error: Option<OnErrorConfig>,
}

/// Backoff policy used when `on_error.action == Retry`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRetryPolicy {
    /// Milliseconds to wait before the single permitted retry attempt.
    #[serde(default)]
    pub backoff_ms: u64,
}

/// Error-handling policy for a failed tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnErrorConfig {
    /// The chosen action.
    pub action: OnErrorAction,
    /// Target node for `OnErrorAction::Goto`.
    #[serde(default)]
    pub target_node_id: Option<NodeId>,
}

/// What to do when a tool call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnErrorAction {
    /// Record the failure in `result_variable` and continue normally.
    Continue,
    /// Retry once after `retry.backoff_ms`, then apply the outer policy again.
    Retry,
    /// Route to `target_node_id` instead of the unique outgoing edge.
    Goto,
    /// Record the failure and let the engine follow the unique outgoing edge;
    /// authors are expected to wire it to an Escalate node.
    Escalate,
}

/// Config for [`NodeKind::Condition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Rules evaluated in declared order; first match wins.
    pub conditions: Vec<ConditionRule>,
    /// Fallback target when no rule matches.
    #[serde(default)]
    pub default_node_id: Option<NodeId>,
}

/// One branch of a [`ConditionConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionRule {
    /// Unique id within the node, for diagnostics.
    pub id: String,
    /// Dotted path evaluated against session variables.
    pub variable: String,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Right-hand side of the comparison.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Node to route to when this rule matches.
    pub target_node_id: NodeId,
}

/// The condition operator set. See `flow-core::interpolate` for semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Equal, falling back to string equality when direct equality fails.
    Equals,
    /// Negation of [`ConditionOperator::Equals`].
    NotEquals,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `<`.
    LessThan,
    /// Numeric `>=`.
    GreaterThanOrEqual,
    /// Numeric `<=`.
    LessThanOrEqual,
    /// String containment.
    Contains,
    /// String prefix.
    StartsWith,
    /// String suffix.
    EndsWith,
    /// Regex match; an invalid pattern never matches.
    MatchesRegex,
    /// Matches absent, null, or empty-string values.
    IsEmpty,
}

/// Config for [`NodeKind::Escalate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalateConfig {
    /// Reason recorded on the `session_escalated` event.
    pub reason: String,
    /// Target queue, opaque to the core.
    #[serde(default)]
    pub queue: Option<String>,
    /// Priority hint, opaque to the core.
    #[serde(default)]
    pub priority: Option<String>,
    /// Interpolated context payload recorded alongside the escalation.
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
    /// Interpolated message emitted before terminating.
    #[serde(default)]
    pub handoff_message: Option<String>,
}

/// Config for [`NodeKind::End`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndConfig {
    /// Interpolated message emitted before terminating.
    #[serde(default)]
    pub message: Option<String>,
    /// Terminal status applied to the session.
    pub status: EndStatus,
    /// Free-form summary recorded for observability.
    #[serde(default)]
    pub summary: Option<String>,
}

/// The terminal status an End node assigns to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndStatus {
    /// Ordinary successful completion.
    Completed,
    /// Handed off to a human.
    Escalated,
    /// The user left without completing the flow.
    Abandoned,
    /// Terminated due to an error.
    Error,
}

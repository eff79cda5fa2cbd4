//! Service contracts — §4.3. Three interfaces consumed by node handlers;
//! implementations (a real model, a real knowledge base, a real HTTP tool
//! executor) are out of scope for this core. Like
//! [`crate::store::SessionStore`], these are injected references the engine
//! owns for the duration of its lifetime, not process-wide globals.

use crate::error::ServiceError;
use crate::node::ModelConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A candidate intent passed to [`AiService::classify`]. A slimmer view of
/// [`crate::node::IntentDeclaration`] — the target node id is the router's
/// concern, not the classifier's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentOption {
    /// Intent name, matched against the classifier's returned name.
    pub name: String,
    /// Description given to the classifier.
    pub description: String,
}

/// Result of an [`AiService::classify`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResult {
    /// The classifier's chosen intent name. MAY be a name absent from the
    /// provided `intents` list if classification failed to converge; the
    /// engine treats unrecognised names as no-match rather than an error.
    pub intent: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Optional free-form rationale, carried through for observability.
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// The AI classification/generation contract.
#[async_trait]
pub trait AiService: Send + Sync {
    /// Classify `user_message` against `intents`, optionally steered by
    /// `system_prompt` and `model`. MUST return one of the provided intent
    /// names on success when classification is confident; MAY return an
    /// arbitrary string when it is not.
    async fn classify(
        &self,
        system_prompt: &str,
        user_message: &str,
        intents: &[IntentOption],
        model: Option<&ModelConfig>,
    ) -> Result<ClassifyResult, ServiceError>;
}

/// One retrieved document from a [`KnowledgeService::search`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeResult {
    /// Source identifier, opaque to the core.
    pub source: String,
    /// The retrieved text.
    pub text: String,
    /// Relevance score.
    pub score: f64,
}

/// Result of a [`KnowledgeService::search`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSearchResult {
    /// Individual retrieved results.
    #[serde(default)]
    pub results: Vec<KnowledgeResult>,
    /// Synthesized answer, if the service produces one.
    #[serde(default)]
    pub answer: Option<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether `answer` is derived solely from `results`.
    pub grounded: bool,
}

/// The knowledge-base retrieval contract.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Search `knowledge_base_id` for `query`, returning at most `top_k`
    /// results no less relevant than `min_score`.
    async fn search(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: u32,
        min_score: f64,
    ) -> Result<KnowledgeSearchResult, ServiceError>;
}

/// Result of a [`ToolService::execute`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    /// Whether the tool reported success.
    pub success: bool,
    /// The tool's output payload, on success.
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    /// A human-readable error, on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// The tool-execution contract. The core never retries a tool call itself
/// except via the calling node's `retry` configuration.
#[async_trait]
pub trait ToolService: Send + Sync {
    /// Invoke `tool_id` with `inputs`, allowing at most `timeout_ms`
    /// (`None` defers to the service's own default).
    async fn execute(
        &self,
        tool_id: &str,
        inputs: &serde_json::Value,
        timeout_ms: Option<u64>,
    ) -> Result<ToolExecutionResult, ServiceError>;
}

/// The bundle of pluggable collaborators a handler may call into. Bundled by
/// value (all `Arc`-backed) so `flow-handlers::executor::Executor` can pass
/// one reference per dispatch rather than threading three separately.
#[derive(Clone)]
pub struct Services {
    /// The AI classification service.
    pub ai: std::sync::Arc<dyn AiService>,
    /// The knowledge retrieval service.
    pub knowledge: std::sync::Arc<dyn KnowledgeService>,
    /// The tool execution service.
    pub tool: std::sync::Arc<dyn ToolService>,
    /// Fallback passed to `ToolService::execute` when a Tool-Call node's own
    /// `config.timeout` is unset. Set by the engine from its
    /// `default_tool_timeout_ms` configuration; `None` means "no timeout
    /// unless the node names one".
    pub default_tool_timeout_ms: Option<u64>,
}

impl Services {
    /// Bundle three service implementations, with no default tool timeout.
    pub fn new(
        ai: std::sync::Arc<dyn AiService>,
        knowledge: std::sync::Arc<dyn KnowledgeService>,
        tool: std::sync::Arc<dyn ToolService>,
    ) -> Self {
        Self {
            ai,
            knowledge,
            tool,
            default_tool_timeout_ms: None,
        }
    }

    /// Attach a fallback tool-call timeout, builder-style.
    pub fn with_default_tool_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_tool_timeout_ms = Some(timeout_ms);
        self
    }
}

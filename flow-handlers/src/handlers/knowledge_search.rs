//! Knowledge-Search — §4.4.5. Queries the knowledge service and writes the
//! result to a session variable, substituting a canonical "not found" shape
//! when `groundedOnly` is set and the service's answer isn't grounded.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, Node, NodeConfig, NodeResult, Services, Session};
use serde_json::json;

/// Handler for [`flow_core::NodeKind::KnowledgeSearch`].
#[derive(Debug, Default)]
pub struct KnowledgeSearchHandler;

const DEFAULT_TOP_K: u32 = 3;
const DEFAULT_MIN_SCORE: f64 = 0.5;

#[async_trait]
impl NodeHandler for KnowledgeSearchHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::KnowledgeSearch(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "knowledge_search",
                actual: node.kind(),
            });
        };

        let query = interpolate(&cfg.query, &session.variables);
        let top_k = cfg.top_k.unwrap_or(DEFAULT_TOP_K);
        let min_score = cfg.min_score.unwrap_or(DEFAULT_MIN_SCORE);

        let result = services
            .knowledge
            .search(&cfg.knowledge_base_id, &query, top_k, min_score)
            .await?;

        let value = if cfg.grounded_only && !result.grounded {
            json!({"answer": "", "sources": [], "confidence": 0.0, "grounded": false})
        } else {
            serde_json::to_value(&result).unwrap_or(serde_json::Value::Null)
        };

        let mut patch = flow_core::VariablePatch::new();
        patch.insert(cfg.result_variable.clone(), value);
        Ok(NodeResult::default().with_variables(patch))
    }
}

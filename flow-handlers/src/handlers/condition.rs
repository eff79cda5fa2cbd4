//! Condition — §4.4.7. Evaluates branch rules in declared order; the first
//! match wins. No match falls back to `defaultNodeId`, or to the unique
//! outgoing edge if none is configured.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{evaluate_operator, resolve, Node, NodeConfig, NodeResult, Services, Session};

/// Handler for [`flow_core::NodeKind::Condition`].
#[derive(Debug, Default)]
pub struct ConditionHandler;

#[async_trait]
impl NodeHandler for ConditionHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::Condition(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "condition",
                actual: node.kind(),
            });
        };

        for rule in &cfg.conditions {
            let left = resolve(&session.variables, &rule.variable);
            if evaluate_operator(rule.operator, left, &rule.value) {
                return Ok(NodeResult::default().with_next_node(rule.target_node_id.clone()));
            }
        }

        match &cfg.default_node_id {
            Some(default_node) => Ok(NodeResult::default().with_next_node(default_node.clone())),
            None => Ok(NodeResult::continue_silently()),
        }
    }
}

//! Escalate — §4.4.8. Terminates the session for human handoff. Always
//! assigns `SessionStatus::Escalated`; the `session_escalated` event itself
//! is emitted by the engine, which reads `reason` back off this node's
//! config once it sees `NodeResult::end == Some(Escalated)`.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, Node, NodeConfig, NodeResult, Services, Session, SessionStatus};
use serde_json::json;

/// Handler for [`flow_core::NodeKind::Escalate`].
#[derive(Debug, Default)]
pub struct EscalateHandler;

#[async_trait]
impl NodeHandler for EscalateHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::Escalate(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "escalate",
                actual: node.kind(),
            });
        };

        let message = cfg
            .handoff_message
            .as_deref()
            .map(|template| interpolate(template, &session.variables));

        let context: serde_json::Map<String, serde_json::Value> = cfg
            .context
            .iter()
            .map(|(key, value)| {
                let interpolated = match value {
                    serde_json::Value::String(s) => {
                        serde_json::Value::String(interpolate(s, &session.variables))
                    }
                    other => other.clone(),
                };
                (key.clone(), interpolated)
            })
            .collect();

        let output = json!({
            "reason": cfg.reason,
            "queue": cfg.queue,
            "priority": cfg.priority,
            "context": context,
        });

        Ok(NodeResult {
            message,
            output: Some(output),
            end: Some(SessionStatus::Escalated),
            ..NodeResult::default()
        })
    }
}

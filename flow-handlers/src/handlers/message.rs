//! Message — §4.4.2. Emits one templated message, optionally after a delay,
//! then falls through to the unique outgoing edge.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, Node, NodeConfig, NodeResult, Services, Session};
use std::time::Duration;

/// Handler for [`flow_core::NodeKind::Message`].
#[derive(Debug, Default)]
pub struct MessageHandler;

#[async_trait]
impl NodeHandler for MessageHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::Message(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "message",
                actual: node.kind(),
            });
        };

        if let Some(delay_ms) = cfg.delay {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        let message = interpolate(&cfg.message, &session.variables);
        Ok(NodeResult::message(message))
    }
}

//! Start — §4.4.1. Entry point of a flow; seeds variables and optionally
//! emits a welcome message, then falls through to the unique outgoing edge.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, Node, NodeConfig, NodeResult, Services, Session};

/// Handler for [`flow_core::NodeKind::Start`].
#[derive(Debug, Default)]
pub struct StartHandler;

#[async_trait]
impl NodeHandler for StartHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::Start(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "start",
                actual: node.kind(),
            });
        };

        let message = cfg
            .welcome_message
            .as_deref()
            .map(|template| interpolate(template, &session.variables));

        Ok(NodeResult {
            message,
            variables: cfg.init_variables.clone(),
            ..NodeResult::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_services, node_with_config, sample_session};
    use flow_core::StartConfig;
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn welcome_message_is_interpolated() {
        let node = node_with_config(NodeConfig::Start(StartConfig {
            welcome_message: Some("Hi {{name}}!".to_string()),
            init_variables: HashMap::new(),
        }));
        let mut session = sample_session();
        session.variables.insert("name".to_string(), json!("Ada"));
        let (services, ..) = mock_services();

        let result = StartHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(result.message.as_deref(), Some("Hi Ada!"));
    }

    #[tokio::test]
    async fn init_variables_are_returned_as_a_patch() {
        let mut init = HashMap::new();
        init.insert("counter".to_string(), json!(0));
        let node = node_with_config(NodeConfig::Start(StartConfig {
            welcome_message: None,
            init_variables: init,
        }));
        let session = sample_session();
        let (services, ..) = mock_services();

        let result = StartHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(result.variables.get("counter"), Some(&json!(0)));
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn wrong_config_kind_is_rejected() {
        let node = node_with_config(NodeConfig::End(flow_core::EndConfig {
            message: None,
            status: flow_core::EndStatus::Completed,
            summary: None,
        }));
        let session = sample_session();
        let (services, ..) = mock_services();

        let result = StartHandler.handle(&node, &session, None, &services).await;
        assert!(matches!(result, Err(HandlerError::ConfigMismatch { .. })));
    }
}

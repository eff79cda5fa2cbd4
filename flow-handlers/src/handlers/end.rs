//! End — §4.4.9. Terminates the session with the status named in
//! `config.status`, with no outgoing edge to follow.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, EndStatus, Node, NodeConfig, NodeResult, Services, Session, SessionStatus};

/// Handler for [`flow_core::NodeKind::End`].
#[derive(Debug, Default)]
pub struct EndHandler;

fn map_status(status: EndStatus) -> SessionStatus {
    match status {
        EndStatus::Completed => SessionStatus::Completed,
        EndStatus::Escalated => SessionStatus::Escalated,
        EndStatus::Abandoned => SessionStatus::Abandoned,
        EndStatus::Error => SessionStatus::Error,
    }
}

#[async_trait]
impl NodeHandler for EndHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::End(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "end",
                actual: node.kind(),
            });
        };

        let message = cfg
            .message
            .as_deref()
            .map(|template| interpolate(template, &session.variables));

        Ok(NodeResult {
            message,
            end: Some(map_status(cfg.status)),
            ..NodeResult::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_services, node_with_config, sample_session};
    use flow_core::EndConfig;

    async fn end_with_status(status: EndStatus) -> NodeResult {
        let node = node_with_config(NodeConfig::End(EndConfig {
            message: Some("Goodbye, {{name}}.".to_string()),
            status,
            summary: None,
        }));
        let mut session = sample_session();
        session.variables.insert("name".to_string(), serde_json::json!("Sam"));
        let (services, ..) = mock_services();
        EndHandler.handle(&node, &session, None, &services).await.unwrap()
    }

    #[tokio::test]
    async fn completed_status_maps_through() {
        let result = end_with_status(EndStatus::Completed).await;
        assert_eq!(result.end, Some(SessionStatus::Completed));
        assert_eq!(result.message.as_deref(), Some("Goodbye, Sam."));
    }

    #[tokio::test]
    async fn abandoned_status_maps_through() {
        let result = end_with_status(EndStatus::Abandoned).await;
        assert_eq!(result.end, Some(SessionStatus::Abandoned));
    }

    #[tokio::test]
    async fn escalated_status_maps_through() {
        let result = end_with_status(EndStatus::Escalated).await;
        assert_eq!(result.end, Some(SessionStatus::Escalated));
    }

    #[tokio::test]
    async fn error_status_maps_through() {
        let result = end_with_status(EndStatus::Error).await;
        assert_eq!(result.end, Some(SessionStatus::Error));
    }
}

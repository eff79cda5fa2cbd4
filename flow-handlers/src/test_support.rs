//! Shared fixture builders for handler unit tests. Not part of the public
//! API — only compiled under `#[cfg(test)]`.

use flow_core::test_utils::{MockAiService, MockKnowledgeService, MockToolService};
use flow_core::{FlowId, Node, NodeConfig, NodeId, Services, Session, SessionStatus};
use std::collections::HashMap;
use std::sync::Arc;

/// A session with no variables, a fresh id, and `Active` status.
pub fn sample_session() -> Session {
    sample_session_with_vars(HashMap::new())
}

/// A session seeded with the given variables.
pub fn sample_session_with_vars(variables: HashMap<String, serde_json::Value>) -> Session {
    Session {
        id: flow_core::SessionId::from("test-session"),
        flow_id: FlowId::from("test-flow"),
        current_node_id: NodeId::from("node-1"),
        variables,
        history: vec![],
        status: SessionStatus::Active,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
        metadata: None,
    }
}

/// Wrap a config in a `Node` with a fixed id and name.
pub fn node_with_config(config: NodeConfig) -> Node {
    Node {
        id: NodeId::from("node-1"),
        name: "test node".to_string(),
        position: None,
        config,
    }
}

/// A `Services` bundle backed entirely by empty-queue mocks; callers push
/// responses before exercising a handler.
pub fn mock_services() -> (Services, Arc<MockAiService>, Arc<MockKnowledgeService>, Arc<MockToolService>) {
    let ai = Arc::new(MockAiService::new());
    let knowledge = Arc::new(MockKnowledgeService::new());
    let tool = Arc::new(MockToolService::new());
    let services = Services::new(ai.clone(), knowledge.clone(), tool.clone());
    (services, ai, knowledge, tool)
}

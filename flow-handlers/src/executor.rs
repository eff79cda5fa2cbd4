//! Handler dispatch — §4.5. [`HandlerRegistry`] maps [`NodeKind`] to a
//! handler by direct lookup, the way `flow-core::node` already documents as
//! the intended extension point over the closed node-kind enum
//! (`other_examples`'s n8n-style `NodeExecutorRegistry` is the same shape:
//! a map from a kind discriminator to a boxed executor, not a vtable on the
//! node type itself). [`Executor`] wraps the registry and folds any
//! [`HandlerError`] into a fatal [`NodeResult`] so the run loop only ever
//! has to handle one return type.

use crate::{HandlerError, NodeHandler};
use flow_core::{ErrorCode, FlowError, Node, NodeKind, NodeResult, Services, Session};
use std::collections::HashMap;
use std::sync::Arc;

/// A map from node kind to the handler that implements it.
pub struct HandlerRegistry {
    handlers: HashMap<NodeKind, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
    /// An empty registry with no handlers registered.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry with the nine built-in handlers registered, one per
    /// [`NodeKind`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(NodeKind::Start, Arc::new(crate::handlers::StartHandler));
        registry.register(NodeKind::Message, Arc::new(crate::handlers::MessageHandler));
        registry.register(NodeKind::CollectInput, Arc::new(crate::handlers::CollectInputHandler));
        registry.register(NodeKind::LlmRouter, Arc::new(crate::handlers::LlmRouterHandler));
        registry.register(NodeKind::KnowledgeSearch, Arc::new(crate::handlers::KnowledgeSearchHandler));
        registry.register(NodeKind::ToolCall, Arc::new(crate::handlers::ToolCallHandler));
        registry.register(NodeKind::Condition, Arc::new(crate::handlers::ConditionHandler));
        registry.register(NodeKind::Escalate, Arc::new(crate::handlers::EscalateHandler));
        registry.register(NodeKind::End, Arc::new(crate::handlers::EndHandler));
        registry
    }

    /// Register (or replace) the handler for a kind.
    pub fn register(&mut self, kind: NodeKind, handler: Arc<dyn NodeHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Look up the handler for a kind, if any is registered.
    pub fn get(&self, kind: NodeKind) -> Option<&Arc<dyn NodeHandler>> {
        self.handlers.get(&kind)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Dispatches a node to its registered handler and normalizes the outcome.
pub struct Executor {
    registry: HandlerRegistry,
}

impl Executor {
    /// Build an executor around a registry.
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Execute one node. Never returns an `Err` — a missing handler or a
    /// raised [`HandlerError`] both become a fatal [`NodeResult`] so the
    /// engine's run loop has a single shape to apply.
    pub async fn execute(
        &self,
        node: &Node,
        session: &Session,
        input: Option<&str>,
        services: &Services,
    ) -> NodeResult {
        let Some(handler) = self.registry.get(node.kind()) else {
            return NodeResult::fatal(FlowError::new(
                ErrorCode::UnknownNodeType,
                format!("no handler registered for node kind {:?}", node.kind()),
            ));
        };

        match handler.handle(node, session, input, services).await {
            Ok(result) => result,
            Err(HandlerError::Service(e)) => NodeResult::fatal(FlowError::new(
                ErrorCode::ExecutionError,
                format!("service call failed: {e}"),
            )),
            Err(e @ HandlerError::ConfigMismatch { .. }) => {
                NodeResult::fatal(FlowError::new(ErrorCode::ExecutionError, e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_services, node_with_config, sample_session};
    use flow_core::StartConfig;
    use std::collections::HashMap;

    #[tokio::test]
    async fn dispatches_to_the_registered_handler() {
        let executor = Executor::new(HandlerRegistry::with_defaults());
        let node = node_with_config(flow_core::NodeConfig::Start(StartConfig {
            welcome_message: Some("hi".to_string()),
            init_variables: HashMap::new(),
        }));
        let session = sample_session();
        let (services, ..) = mock_services();

        let result = executor.execute(&node, &session, None, &services).await;
        assert_eq!(result.message.as_deref(), Some("hi"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn unregistered_kind_is_fatal_unknown_node_type() {
        let executor = Executor::new(HandlerRegistry::empty());
        let node = node_with_config(flow_core::NodeConfig::Start(StartConfig {
            welcome_message: None,
            init_variables: HashMap::new(),
        }));
        let session = sample_session();
        let (services, ..) = mock_services();

        let result = executor.execute(&node, &session, None, &services).await;
        let error = result.error.expect("expected fatal error");
        assert_eq!(error.code, flow_core::ErrorCode::UnknownNodeType);
    }
}

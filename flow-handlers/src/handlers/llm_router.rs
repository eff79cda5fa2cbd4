//! LLM-Router — §4.4.4. Classifies the user's message into one of the
//! node's declared intents and routes to that intent's target node, falling
//! back to `fallbackIntent` when confidence is low, the name doesn't match
//! any declared intent, or classification itself fails.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{
    ErrorCode, FlowError, IntentDeclaration, IntentOption, Node, NodeConfig, NodeId, NodeResult,
    Services, Session,
};
use serde_json::json;

/// Handler for [`flow_core::NodeKind::LlmRouter`].
#[derive(Debug, Default)]
pub struct LlmRouterHandler;

const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// The message text the router classifies, per the fallback chain in §4.4.4:
/// the handler's own `input` first (only ever set when re-entered with fresh
/// text), then `variables.user_message`, then `variables.customer_message`,
/// then an empty string.
fn resolve_user_message(input: Option<&str>, session: &Session) -> String {
    input
        .map(str::to_string)
        .or_else(|| {
            session
                .variables
                .get("user_message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .or_else(|| {
            session
                .variables
                .get("customer_message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default()
}

fn find_intent<'a>(intents: &'a [IntentDeclaration], name: &str) -> Option<&'a IntentDeclaration> {
    intents.iter().find(|i| i.name == name)
}

/// Route to the configured fallback intent, or fail with `IntentNotFound`
/// if none is configured or the name it names doesn't exist.
fn route_to_fallback(
    intents: &[IntentDeclaration],
    fallback_intent: Option<&str>,
    original_intent: &str,
    confidence: f64,
) -> Result<NodeResult, HandlerError> {
    let Some(fallback_name) = fallback_intent else {
        return Ok(NodeResult::fatal(FlowError::new(
            ErrorCode::IntentNotFound,
            format!("no intent matched '{original_intent}' and no fallbackIntent is configured"),
        )));
    };
    let Some(target) = find_intent(intents, fallback_name) else {
        return Ok(NodeResult::fatal(FlowError::new(
            ErrorCode::IntentNotFound,
            format!("fallbackIntent '{fallback_name}' does not name a declared intent"),
        )));
    };

    let mut patch = flow_core::VariablePatch::new();
    patch.insert("last_intent".to_string(), json!(fallback_name));
    patch.insert("last_confidence".to_string(), json!(confidence));

    Ok(NodeResult::default()
        .with_variables(patch)
        .with_next_node(target.target_node_id.clone())
        .with_output(json!({
            "intent": fallback_name,
            "originalIntent": original_intent,
            "confidence": confidence,
            "fellback": true,
        })))
}

fn route_to(target: NodeId, intent_name: &str, confidence: f64) -> NodeResult {
    let mut patch = flow_core::VariablePatch::new();
    patch.insert("last_intent".to_string(), json!(intent_name));
    patch.insert("last_confidence".to_string(), json!(confidence));

    NodeResult::default()
        .with_variables(patch)
        .with_next_node(target)
        .with_output(json!({"intent": intent_name, "confidence": confidence}))
}

#[async_trait]
impl NodeHandler for LlmRouterHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        input: Option<&str>,
        services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::LlmRouter(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "llm_router",
                actual: node.kind(),
            });
        };

        let user_message = resolve_user_message(input, session);
        let options: Vec<IntentOption> = cfg
            .intents
            .iter()
            .map(|i| IntentOption {
                name: i.name.clone(),
                description: i.description.clone(),
            })
            .collect();
        let threshold = cfg.confidence_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);

        let classify_result = services
            .ai
            .classify(&cfg.system_prompt, &user_message, &options, cfg.model.as_ref())
            .await;

        let rules_provider = cfg
            .model
            .as_ref()
            .is_some_and(|m| m.provider == "rules");

        let result = match classify_result {
            Ok(result) => result,
            Err(e) => {
                if cfg.fallback_intent.is_some() || rules_provider {
                    return route_to_fallback(&cfg.intents, cfg.fallback_intent.as_deref(), "", 0.0);
                }
                return Err(HandlerError::Service(e));
            }
        };

        if result.confidence < threshold && cfg.fallback_intent.is_some() {
            return route_to_fallback(
                &cfg.intents,
                cfg.fallback_intent.as_deref(),
                &result.intent,
                result.confidence,
            );
        }

        match find_intent(&cfg.intents, &result.intent) {
            Some(matched) => Ok(route_to(
                matched.target_node_id.clone(),
                &matched.name,
                result.confidence,
            )),
            None => route_to_fallback(
                &cfg.intents,
                cfg.fallback_intent.as_deref(),
                &result.intent,
                result.confidence,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_services, node_with_config, sample_session};
    use flow_core::{ClassifyResult, LlmRouterConfig};

    fn intent(name: &str, target: &str) -> IntentDeclaration {
        IntentDeclaration {
            name: name.to_string(),
            description: format!("handles {name}"),
            examples: vec![],
            target_node_id: NodeId::from(target),
        }
    }

    fn router_node(intents: Vec<IntentDeclaration>, fallback_intent: Option<&str>) -> Node {
        node_with_config(NodeConfig::LlmRouter(LlmRouterConfig {
            system_prompt: "classify".to_string(),
            intents,
            model: None,
            fallback_intent: fallback_intent.map(str::to_string),
            confidence_threshold: None,
        }))
    }

    #[tokio::test]
    async fn confident_match_routes_directly() {
        let node = router_node(vec![intent("order_status", "n-order"), intent("billing", "n-bill")], None);
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "order_status".to_string(),
            confidence: 0.9,
            reasoning: None,
        });

        let result = LlmRouterHandler.handle(&node, &session, Some("where's my order"), &services).await.unwrap();
        assert_eq!(result.next_node_id, Some(NodeId::from("n-order")));
        assert_eq!(result.variables.get("last_intent"), Some(&serde_json::json!("order_status")));
        assert_eq!(result.variables.get("last_confidence"), Some(&serde_json::json!(0.9)));
    }

    #[tokio::test]
    async fn low_confidence_falls_back() {
        let node = router_node(
            vec![intent("order_status", "n-order"), intent("human", "n-human")],
            Some("human"),
        );
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "order_status".to_string(),
            confidence: 0.1,
            reasoning: None,
        });

        let result = LlmRouterHandler.handle(&node, &session, Some("hmm"), &services).await.unwrap();
        assert_eq!(result.next_node_id, Some(NodeId::from("n-human")));
        assert_eq!(result.variables.get("last_intent"), Some(&serde_json::json!("human")));
    }

    #[tokio::test]
    async fn low_confidence_with_no_fallback_routes_by_name_anyway() {
        let node = router_node(vec![intent("order_status", "n-order")], None);
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "order_status".to_string(),
            confidence: 0.1,
            reasoning: None,
        });

        let result = LlmRouterHandler.handle(&node, &session, Some("hmm"), &services).await.unwrap();
        assert_eq!(result.next_node_id, Some(NodeId::from("n-order")));
        assert_eq!(result.variables.get("last_intent"), Some(&serde_json::json!("order_status")));
    }

    #[tokio::test]
    async fn unmatched_name_with_no_fallback_is_fatal() {
        let node = router_node(vec![intent("order_status", "n-order")], None);
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "something_unlisted".to_string(),
            confidence: 0.95,
            reasoning: None,
        });

        let result = LlmRouterHandler.handle(&node, &session, Some("???"), &services).await.unwrap();
        let error = result.error.expect("expected fatal error");
        assert_eq!(error.code, flow_core::ErrorCode::IntentNotFound);
    }

    #[tokio::test]
    async fn fallback_naming_unknown_intent_is_fatal() {
        let node = router_node(vec![intent("order_status", "n-order")], Some("missing"));
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "order_status".to_string(),
            confidence: 0.0,
            reasoning: None,
        });

        let result = LlmRouterHandler.handle(&node, &session, Some("x"), &services).await.unwrap();
        let error = result.error.expect("expected fatal error");
        assert_eq!(error.code, flow_core::ErrorCode::IntentNotFound);
    }

    #[tokio::test]
    async fn classify_failure_with_fallback_routes_with_zero_confidence() {
        let node = router_node(vec![intent("human", "n-human")], Some("human"));
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_error(flow_core::ServiceError::NonRetryable("down".to_string()));

        let result = LlmRouterHandler.handle(&node, &session, Some("x"), &services).await.unwrap();
        assert_eq!(result.next_node_id, Some(NodeId::from("n-human")));
        assert_eq!(result.variables.get("last_confidence"), Some(&serde_json::json!(0.0)));
    }

    #[tokio::test]
    async fn classify_failure_with_no_fallback_surfaces_as_handler_error() {
        let node = router_node(vec![intent("order_status", "n-order")], None);
        let session = sample_session();
        let (services, ai, ..) = mock_services();
        ai.push_error(flow_core::ServiceError::NonRetryable("down".to_string()));

        let result = LlmRouterHandler.handle(&node, &session, Some("x"), &services).await;
        assert!(matches!(result, Err(HandlerError::Service(_))));
    }

    #[tokio::test]
    async fn user_message_falls_back_to_variables_when_input_absent() {
        let node = router_node(vec![intent("order_status", "n-order")], None);
        let mut session = sample_session();
        session
            .variables
            .insert("user_message".to_string(), serde_json::json!("where is it"));
        let (services, ai, ..) = mock_services();
        ai.push_result(ClassifyResult {
            intent: "order_status".to_string(),
            confidence: 0.8,
            reasoning: None,
        });

        LlmRouterHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(ai.calls()[0].user_message, "where is it");
    }
}

//! Tool-Call — §4.4.6. Invokes the tool service with interpolated inputs and
//! applies the node's `onError` policy on failure: `continue` records the
//! failure and proceeds, `goto` reroutes, `escalate` surfaces the failure on
//! the unique outgoing edge, `retry` allows exactly one extra attempt after
//! `retry.backoffMs`. Absent `onError` makes any failure fatal.

use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{
    interpolate, ErrorCode, FlowError, Node, NodeConfig, NodeResult, OnErrorAction, Services,
    Session, ToolExecutionResult,
};
use serde_json::json;
use std::time::Duration;

/// Handler for [`flow_core::NodeKind::ToolCall`].
#[derive(Debug, Default)]
pub struct ToolCallHandler;

fn interpolate_inputs(
    inputs: &std::collections::HashMap<String, serde_json::Value>,
    vars: &std::collections::HashMap<String, serde_json::Value>,
) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, value) in inputs {
        let interpolated = match value {
            serde_json::Value::String(s) => serde_json::Value::String(interpolate(s, vars)),
            other => other.clone(),
        };
        map.insert(key.clone(), interpolated);
    }
    serde_json::Value::Object(map)
}

/// The outcome of one tool invocation attempt, collapsing
/// `Err(ServiceError)` (an infrastructure failure) and
/// `Ok(ToolExecutionResult { success: false, .. })` (a reported tool
/// failure) into one "failed" case, since the node's `onError` policy treats
/// them identically.
enum Attempt {
    Success(Option<serde_json::Value>),
    Failed(String),
}

async fn attempt(
    services: &Services,
    tool_id: &str,
    inputs: &serde_json::Value,
    timeout_ms: Option<u64>,
) -> Result<Attempt, HandlerError> {
    match services.tool.execute(tool_id, inputs, timeout_ms).await {
        Ok(ToolExecutionResult {
            success: true,
            output,
            ..
        }) => Ok(Attempt::Success(output)),
        Ok(ToolExecutionResult {
            success: false,
            error,
            ..
        }) => Ok(Attempt::Failed(error.unwrap_or_else(|| "tool reported failure".to_string()))),
        Err(e) => Ok(Attempt::Failed(e.to_string())),
    }
}

#[async_trait]
impl NodeHandler for ToolCallHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        _input: Option<&str>,
        services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::ToolCall(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "tool_call",
                actual: node.kind(),
            });
        };

        let inputs = interpolate_inputs(&cfg.inputs, &session.variables);
        let timeout_ms = cfg
            .timeout
            .map(|secs| secs * 1000)
            .or(services.default_tool_timeout_ms);

        let mut outcome = attempt(services, &cfg.tool_id, &inputs, timeout_ms).await?;

        let is_retry_policy = matches!(
            cfg.on_error.as_ref().map(|e| e.action),
            Some(OnErrorAction::Retry)
        );
        if is_retry_policy {
            if let Attempt::Failed(_) = &outcome {
                let backoff_ms = cfg.retry.as_ref().map(|r| r.backoff_ms).unwrap_or(0);
                if backoff_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                outcome = attempt(services, &cfg.tool_id, &inputs, timeout_ms).await?;
            }
        }

        match outcome {
            Attempt::Success(output) => {
                let mut patch = flow_core::VariablePatch::new();
                patch.insert(
                    cfg.result_variable.clone(),
                    output.unwrap_or(serde_json::Value::Null),
                );
                Ok(NodeResult::default().with_variables(patch))
            }
            Attempt::Failed(error_message) => {
                handle_failure(cfg, &error_message, is_retry_policy)
            }
        }
    }
}

fn handle_failure(
    cfg: &flow_core::ToolCallConfig,
    error_message: &str,
    exhausted_retry: bool,
) -> Result<NodeResult, HandlerError> {
    let Some(on_error) = &cfg.on_error else {
        return Ok(NodeResult::fatal(FlowError::new(
            ErrorCode::ToolCallFailed,
            format!("tool '{}' failed: {error_message}", cfg.tool_id),
        )));
    };

    match on_error.action {
        OnErrorAction::Continue => {
            let mut patch = flow_core::VariablePatch::new();
            patch.insert(
                cfg.result_variable.clone(),
                json!({"error": error_message, "success": false}),
            );
            Ok(NodeResult::default().with_variables(patch))
        }
        OnErrorAction::Goto => match &on_error.target_node_id {
            Some(target) => Ok(NodeResult::default().with_next_node(target.clone())),
            None => Ok(NodeResult::fatal(FlowError::new(
                ErrorCode::ToolCallError,
                format!("tool '{}' onError.action is goto but no targetNodeId is set", cfg.tool_id),
            ))),
        },
        OnErrorAction::Escalate => {
            Ok(NodeResult::default().with_output(json!({"error": error_message})))
        }
        OnErrorAction::Retry => {
            // Exhausted the one permitted retry attempt with no further
            // recovery policy; fall back to the same terminal behavior as
            // an absent `onError`.
            debug_assert!(exhausted_retry);
            Ok(NodeResult::fatal(FlowError::new(
                ErrorCode::ToolCallFailed,
                format!(
                    "tool '{}' failed after one retry: {error_message}",
                    cfg.tool_id
                ),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_services, node_with_config, sample_session};
    use flow_core::{OnErrorConfig, ToolCallConfig, ToolRetryPolicy};
    use std::collections::HashMap;

    fn node(on_error: Option<OnErrorConfig>, retry: Option<ToolRetryPolicy>) -> Node {
        let mut inputs = HashMap::new();
        inputs.insert("order_id".to_string(), serde_json::json!("{{order_id}}"));
        node_with_config(NodeConfig::ToolCall(ToolCallConfig {
            tool_id: "lookup_order".to_string(),
            inputs,
            result_variable: "order_result".to_string(),
            timeout: None,
            retry,
            on_error,
        }))
    }

    #[tokio::test]
    async fn successful_call_interpolates_inputs_and_stores_output() {
        let node = node(None, None);
        let mut session = sample_session();
        session.variables.insert("order_id".to_string(), serde_json::json!("A1"));
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: true,
            output: Some(serde_json::json!({"status": "shipped"})),
            error: None,
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(
            result.variables.get("order_result"),
            Some(&serde_json::json!({"status": "shipped"}))
        );
        assert_eq!(tool.calls()[0].inputs, serde_json::json!({"order_id": "A1"}));
    }

    #[tokio::test]
    async fn failure_with_no_policy_is_fatal() {
        let node = node(None, None);
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("timeout".to_string()),
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        let error = result.error.expect("expected fatal error");
        assert_eq!(error.code, flow_core::ErrorCode::ToolCallFailed);
    }

    #[tokio::test]
    async fn continue_policy_records_failure_and_proceeds() {
        let node = node(
            Some(OnErrorConfig {
                action: OnErrorAction::Continue,
                target_node_id: None,
            }),
            None,
        );
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("down".to_string()),
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert!(result.error.is_none());
        assert_eq!(
            result.variables.get("order_result"),
            Some(&serde_json::json!({"error": "down", "success": false}))
        );
    }

    #[tokio::test]
    async fn goto_policy_reroutes_on_failure() {
        let node = node(
            Some(OnErrorConfig {
                action: OnErrorAction::Goto,
                target_node_id: Some(flow_core::NodeId::from("n-fallback")),
            }),
            None,
        );
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("down".to_string()),
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(result.next_node_id, Some(flow_core::NodeId::from("n-fallback")));
    }

    #[tokio::test]
    async fn escalate_policy_sets_output_and_follows_unique_edge() {
        let node = node(
            Some(OnErrorConfig {
                action: OnErrorAction::Escalate,
                target_node_id: None,
            }),
            None,
        );
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("down".to_string()),
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert!(result.next_node_id.is_none());
        assert_eq!(result.output.unwrap()["error"], serde_json::json!("down"));
    }

    #[tokio::test]
    async fn retry_policy_makes_exactly_one_extra_attempt() {
        let node = node(
            Some(OnErrorConfig {
                action: OnErrorAction::Retry,
                target_node_id: None,
            }),
            Some(ToolRetryPolicy { backoff_ms: 1 }),
        );
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("transient".to_string()),
        });
        tool.push_result(ToolExecutionResult {
            success: true,
            output: Some(serde_json::json!({"ok": true})),
            error: None,
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(tool.call_count(), 2);
        assert!(result.error.is_none());
        assert_eq!(result.variables.get("order_result"), Some(&serde_json::json!({"ok": true})));
    }

    #[tokio::test]
    async fn retry_policy_still_failing_after_retry_is_fatal() {
        let node = node(
            Some(OnErrorConfig {
                action: OnErrorAction::Retry,
                target_node_id: None,
            }),
            Some(ToolRetryPolicy { backoff_ms: 1 }),
        );
        let session = sample_session();
        let (services, _, _, tool) = mock_services();
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("down".to_string()),
        });
        tool.push_result(ToolExecutionResult {
            success: false,
            output: None,
            error: Some("still down".to_string()),
        });

        let result = ToolCallHandler.handle(&node, &session, None, &services).await.unwrap();
        assert_eq!(tool.call_count(), 2);
        let error = result.error.expect("expected fatal error");
        assert_eq!(error.code, flow_core::ErrorCode::ToolCallFailed);
    }
}

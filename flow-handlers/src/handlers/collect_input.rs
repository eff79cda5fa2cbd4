//! Collect-Input — §4.4.3. Two-phase: the first call (no input yet) emits
//! the prompt and pauses; the resuming call validates the collected input,
//! retrying with a per-variable attempt counter on failure.

use crate::validate::validate_input;
use crate::{HandlerError, NodeHandler};
use async_trait::async_trait;
use flow_core::{interpolate, ErrorCode, FlowError, Node, NodeConfig, NodeResult, Services, Session};
use serde_json::json;

/// Handler for [`flow_core::NodeKind::CollectInput`].
#[derive(Debug, Default)]
pub struct CollectInputHandler;

fn attempts_key(variable_name: &str) -> String {
    format!("{variable_name}_attempts")
}

fn prior_attempts(session: &Session, variable_name: &str) -> u64 {
    session
        .variables
        .get(&attempts_key(variable_name))
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
}

#[async_trait]
impl NodeHandler for CollectInputHandler {
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        input: Option<&str>,
        _services: &Services,
    ) -> Result<NodeResult, HandlerError> {
        let NodeConfig::CollectInput(cfg) = &node.config else {
            return Err(HandlerError::ConfigMismatch {
                expected: "collect_input",
                actual: node.kind(),
            });
        };

        let Some(raw) = input else {
            let message = cfg
                .prompt
                .as_deref()
                .map(|template| interpolate(template, &session.variables));
            return Ok(NodeResult::wait_for_input(message));
        };

        if validate_input(cfg.validation.as_ref(), raw) {
            let mut patch = flow_core::VariablePatch::new();
            patch.insert(cfg.variable_name.clone(), json!(raw));
            patch.insert(attempts_key(&cfg.variable_name), json!(0));
            return Ok(NodeResult::default().with_variables(patch));
        }

        match &cfg.retry {
            Some(retry) => {
                let attempts = prior_attempts(session, &cfg.variable_name) + 1;
                let mut patch = flow_core::VariablePatch::new();
                patch.insert(attempts_key(&cfg.variable_name), json!(attempts));

                if attempts >= retry.max_attempts as u64 {
                    let error = FlowError::new(
                        ErrorCode::MaxRetriesExceeded,
                        format!(
                            "collect-input '{}' exhausted {} attempts",
                            cfg.variable_name, retry.max_attempts
                        ),
                    );
                    Ok(NodeResult::fatal(error).with_variables(patch))
                } else {
                    Ok(NodeResult {
                        message: Some(retry.retry_message.clone()),
                        wait_for_input: true,
                        variables: patch,
                        ..NodeResult::default()
                    })
                }
            }
            None => {
                let message = cfg
                    .validation
                    .as_ref()
                    .and_then(|v| v.error_message.clone())
                    .unwrap_or_else(|| "Invalid input. Please try again.".to_string());
                Ok(NodeResult::wait_for_input(Some(message)))
            }
        }
    }
}

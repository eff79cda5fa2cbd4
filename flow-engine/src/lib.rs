#![deny(missing_docs)]
//! # flow-engine — the run loop
//!
//! [`Engine`] owns a session store, an event bus, and an executor, and
//! drives a flow graph node-by-node on behalf of callers. It is the only
//! crate that mutates a [`Session`]: every handler is a pure function of
//! `(node, session, input, services)`, and this crate is what applies the
//! [`NodeResult`] each one returns.
//!
//! Grounded on the teacher's `neuron-op-react::ReactOperator::execute` loop
//! shape (resolve config, call provider, apply effect, loop) generalized
//! from a single-operator reasoning loop to a graph walk, and on the
//! `n8n-core::WorkflowEngine::execute_with_events` step-bounded,
//! `tracing`-instrumented node-by-node traversal.

use chrono::Utc;
use flow_core::{
    Event, EventSubscriber, ErrorCode, Flow, FlowError, FlowId, Node, NodeId, NodeResult,
    Services, Session, SessionId, SessionStatus, SessionStore, output_hint,
};
use flow_events::EventBus;
use flow_handlers::Executor;
use std::sync::Arc;

mod config;
pub mod error;

pub use config::EngineConfig;
pub use error::EngineError;

/// Drives flow execution: owns the session store, the handler dispatch
/// table, and the event bus subscribers drain into.
pub struct Engine {
    store: Arc<dyn SessionStore>,
    executor: Executor,
    events: EventBus,
    services: Services,
    config: EngineConfig,
}

impl Engine {
    /// Build an engine from its collaborators. `services` has its
    /// `default_tool_timeout_ms` overridden from `config` regardless of
    /// what was set on the value passed in, so the engine's configuration
    /// is the single source of truth for that fallback.
    pub fn new(
        store: Arc<dyn SessionStore>,
        executor: Executor,
        events: EventBus,
        services: Services,
        config: EngineConfig,
    ) -> Self {
        let services = services.with_default_tool_timeout_ms(config.default_tool_timeout_ms);
        Self {
            store,
            executor,
            events,
            services,
            config,
        }
    }

    /// Register an event subscriber. Returns its index, usable to
    /// unsubscribe later via the underlying bus (not currently exposed
    /// here — callers needing unsubscribe should own their own [`EventBus`]
    /// and pass it to [`Engine::new`]).
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) -> usize {
        self.events.subscribe(subscriber)
    }

    /// Start a new session against `flow`, seed its variables, and drive
    /// the run loop from the entry node.
    pub async fn start_session(&self, flow: &Flow) -> Result<Session, EngineError> {
        let entry = flow
            .node(&flow.entry_node)
            .ok_or_else(|| EngineError::EntryNotFound(flow.entry_node.to_string()))?;

        let mut variables = std::collections::HashMap::new();
        for decl in &flow.variables {
            if let Some(default) = &decl.default_value {
                variables.insert(decl.name.clone(), default.clone());
            }
        }
        if let flow_core::NodeConfig::Start(start_cfg) = &entry.config {
            for (k, v) in &start_cfg.init_variables {
                variables.insert(k.clone(), v.clone());
            }
        }

        let now = Utc::now();
        let session = Session {
            id: SessionId::new(uuid_like(&flow.id, now)),
            flow_id: flow.id.clone(),
            current_node_id: flow.entry_node.clone(),
            variables,
            history: Vec::new(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
            metadata: None,
        };

        self.events
            .emit(&Event::SessionStarted {
                session_id: session.id.clone(),
                flow_id: flow.id.clone(),
                timestamp: now,
            })
            .await;

        self.run(flow, session, None).await
    }

    /// Resume a waiting session with new input and drive the run loop.
    pub async fn process_input(
        &self,
        flow: &Flow,
        session_id: &SessionId,
        input: impl Into<String>,
    ) -> Result<Session, EngineError> {
        let mut session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))?;

        if session.status != SessionStatus::WaitingInput {
            return Err(EngineError::SessionNotWaiting(session_id.to_string()));
        }

        let input = input.into();
        self.events
            .emit(&Event::InputReceived {
                session_id: session.id.clone(),
                input: input.clone(),
                timestamp: Utc::now(),
            })
            .await;
        session.status = SessionStatus::Active;

        self.run(flow, session, Some(input)).await
    }

    /// Look up a session by id without advancing it.
    pub async fn get_session(&self, session_id: &SessionId) -> Result<Option<Session>, EngineError> {
        Ok(self.store.get(session_id).await?)
    }

    /// Delete a session.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<(), EngineError> {
        Ok(self.store.delete(session_id).await?)
    }

    /// The §4.6 run loop. `first_input` is consumed by only the first
    /// handler invocation, then cleared, matching `process_input`'s
    /// single-consumption contract.
    async fn run(
        &self,
        flow: &Flow,
        mut session: Session,
        first_input: Option<String>,
    ) -> Result<Session, EngineError> {
        let mut input = first_input;
        let mut steps: u32 = 0;

        loop {
            if steps >= self.config.max_steps {
                tracing::warn!(session_id = %session.id, steps, "max steps exceeded");
                session.status = SessionStatus::Error;
                self.events
                    .emit(&Event::NodeError {
                        session_id: session.id.clone(),
                        node_id: session.current_node_id.clone(),
                        node_kind: flow
                            .node(&session.current_node_id)
                            .map(|n| n.kind())
                            .unwrap_or(flow_core::NodeKind::Start),
                        error: FlowError::new(
                            ErrorCode::MaxStepsExceeded,
                            format!("exceeded {} steps", self.config.max_steps),
                        ),
                        timestamp: Utc::now(),
                    })
                    .await;
                break;
            }

            let Some(node) = flow.node(&session.current_node_id) else {
                // A dangling edge target or next_node_id; there's no real
                // kind to report for a node that doesn't exist.
                session.status = SessionStatus::Error;
                self.events
                    .emit(&Event::NodeError {
                        session_id: session.id.clone(),
                        node_id: session.current_node_id.clone(),
                        node_kind: flow_core::NodeKind::Start,
                        error: FlowError::new(
                            ErrorCode::NodeNotFound,
                            format!("node {} not found", session.current_node_id),
                        ),
                        timestamp: Utc::now(),
                    })
                    .await;
                break;
            };

            self.events
                .emit(&Event::NodeStarted {
                    session_id: session.id.clone(),
                    node_id: node.id.clone(),
                    node_kind: node.kind(),
                    timestamp: Utc::now(),
                })
                .await;
            tracing::debug!(session_id = %session.id, node_id = %node.id, kind = ?node.kind(), "dispatching node");
            let start = std::time::Instant::now();

            let result = self
                .executor
                .execute(node, &session, input.as_deref(), &self.services)
                .await;
            let duration_ms = start.elapsed().as_millis() as u64;
            let consumed_input = input.take();

            self.record_step(&mut session, node, &result, duration_ms, consumed_input);

            match &result.error {
                Some(err) => {
                    self.events
                        .emit(&Event::NodeError {
                            session_id: session.id.clone(),
                            node_id: node.id.clone(),
                            node_kind: node.kind(),
                            error: err.clone(),
                            timestamp: Utc::now(),
                        })
                        .await;
                }
                None => {
                    self.events
                        .emit(&Event::NodeCompleted {
                            session_id: session.id.clone(),
                            node_id: node.id.clone(),
                            node_kind: node.kind(),
                            duration_ms,
                            timestamp: Utc::now(),
                        })
                        .await;
                }
            }

            session.apply_patch(&result.variables);

            if let Some(message) = &result.message {
                self.events
                    .emit(&Event::MessageSent {
                        session_id: session.id.clone(),
                        node_id: node.id.clone(),
                        message: message.clone(),
                        timestamp: Utc::now(),
                    })
                    .await;
            }

            if result.error.is_some() {
                session.status = SessionStatus::Error;
                break;
            }

            if result.wait_for_input {
                session.status = SessionStatus::WaitingInput;
                break;
            }

            if let Some(end_status) = result.end {
                session.status = end_status;
                if end_status == SessionStatus::Escalated {
                    let reason = match &node.config {
                        flow_core::NodeConfig::Escalate(cfg) => cfg.reason.clone(),
                        _ => "escalated".to_string(),
                    };
                    self.events
                        .emit(&Event::SessionEscalated {
                            session_id: session.id.clone(),
                            reason,
                            timestamp: Utc::now(),
                        })
                        .await;
                } else {
                    self.events
                        .emit(&Event::SessionCompleted {
                            session_id: session.id.clone(),
                            status: end_status,
                            timestamp: Utc::now(),
                        })
                        .await;
                }
                break;
            }

            match self.pick_next_node(flow, node, &result) {
                Some(next) => session.current_node_id = next,
                None => {
                    session.status = SessionStatus::Completed;
                    self.events
                        .emit(&Event::SessionCompleted {
                            session_id: session.id.clone(),
                            status: SessionStatus::Completed,
                            timestamp: Utc::now(),
                        })
                        .await;
                    break;
                }
            }

            steps += 1;
        }

        session.updated_at = Utc::now();
        self.store.set(&session).await?;
        Ok(session)
    }

    fn record_step(
        &self,
        session: &mut Session,
        node: &Node,
        result: &NodeResult,
        duration_ms: u64,
        input: Option<String>,
    ) {
        let step_id = session.history.len() as u64;
        session.history.push(flow_core::ExecutionStep {
            step_id,
            node_id: node.id.clone(),
            node_kind: node.kind(),
            timestamp: Utc::now(),
            input,
            output: result.output.clone(),
            duration_ms,
            error: result.error.clone(),
        });
    }

    /// §4.6 step 10: prefer an explicit override, else walk outgoing edges
    /// preferring one whose `source_handle`/`label` matches the handler's
    /// output hint, else the first outgoing edge, else none.
    fn pick_next_node(&self, flow: &Flow, node: &Node, result: &NodeResult) -> Option<NodeId> {
        if let Some(explicit) = &result.next_node_id {
            return Some(explicit.clone());
        }

        let mut edges = flow.outgoing_edges(&node.id).peekable();
        edges.peek()?;

        if let Some(hint) = result.output.as_ref().and_then(output_hint) {
            for edge in flow.outgoing_edges(&node.id) {
                if edge.source_handle.as_deref() == Some(hint) || edge.label.as_deref() == Some(hint) {
                    return Some(edge.target.clone());
                }
            }
        }

        flow.outgoing_edges(&node.id).next().map(|e| e.target.clone())
    }
}

/// A deterministic-enough session id seed. The runtime doesn't require
/// globally unique ids beyond stable lookup within a store, so this avoids
/// pulling in a UUID dependency the teacher's own workspace doesn't use for
/// the equivalent `WorkflowId`/`AgentId` (those are caller-supplied, not
/// engine-generated) — callers that need collision-resistant ids across
/// processes should generate [`SessionId`]s themselves and use a store
/// keyed accordingly.
fn uuid_like(flow_id: &FlowId, now: chrono::DateTime<Utc>) -> String {
    format!("{}-{}", flow_id.as_str(), now.timestamp_nanos_opt().unwrap_or_default())
}

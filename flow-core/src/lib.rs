//! # flow-core — data model and contracts for the conversational flow runtime
//!
//! This crate defines the shapes every other `flow-*` crate builds on: the
//! flow/node/session data model, the interpolation and condition-evaluation
//! utilities, the three service contracts node handlers call into, the
//! session-store contract, the error/event vocabulary, and typed ids.
//!
//! Nothing in this crate executes a flow — that's `flow-handlers` (per-kind
//! semantics) and `flow-engine` (the run loop). This crate only defines what
//! they agree on, the way the teacher's `layer0` crate defines protocol
//! traits without providing a runtime that drives them.

#![deny(missing_docs)]

pub mod error;
pub mod events;
pub mod flow;
pub mod id;
pub mod interpolate;
pub mod node;
pub mod node_result;
pub mod services;
pub mod session;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience.
pub use error::{ErrorCode, FlowError, ServiceError, StoreError};
pub use events::{Event, EventSubscriber};
pub use flow::{Edge, Flow, FlowMetadata, ToolDeclaration, VariableDeclaration, VariablePatch, VariableType};
pub use id::{EdgeId, FlowId, NodeId, SessionId};
pub use interpolate::{evaluate_operator, interpolate, resolve};
pub use node::{
    CollectInputConfig, CollectInputTimeout, ConditionConfig, ConditionOperator, ConditionRule,
    EndConfig, EndStatus, EscalateConfig, IntentDeclaration, KnowledgeSearchConfig,
    LlmRouterConfig, MessageConfig, ModelConfig, Node, NodeConfig, NodeKind, OnErrorAction,
    OnErrorConfig, Position, RetryPolicy, StartConfig, ToolCallConfig, ToolRetryPolicy,
    ValidationConfig, ValidationKind,
};
pub use node_result::{output_hint, NodeResult};
pub use services::{
    AiService, ClassifyResult, IntentOption, KnowledgeResult, KnowledgeSearchResult,
    KnowledgeService, Services, ToolExecutionResult, ToolService,
};
pub use session::{ExecutionStep, Session, SessionStatus};
pub use store::SessionStore;

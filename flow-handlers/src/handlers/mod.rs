//! One module per [`flow_core::NodeKind`].

mod collect_input;
mod condition;
mod end;
mod escalate;
mod knowledge_search;
mod llm_router;
mod message;
mod start;
mod tool_call;

pub use collect_input::CollectInputHandler;
pub use condition::ConditionHandler;
pub use end::EndHandler;
pub use escalate::EscalateHandler;
pub use knowledge_search::KnowledgeSearchHandler;
pub use llm_router::LlmRouterHandler;
pub use message::MessageHandler;
pub use start::StartHandler;
pub use tool_call::ToolCallHandler;

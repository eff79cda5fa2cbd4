//! In-memory and mock implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the trait APIs are usable, reused across every
//! `flow-*` crate's test suite rather than reinvented per crate.

mod in_memory_store;
mod mock_ai;
mod mock_knowledge;
mod mock_tool;
mod recording_subscriber;

pub use in_memory_store::InMemorySessionStore;
pub use mock_ai::MockAiService;
pub use mock_knowledge::MockKnowledgeService;
pub use mock_tool::MockToolService;
pub use recording_subscriber::RecordingSubscriber;

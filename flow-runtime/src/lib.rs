#![deny(missing_docs)]
//! # flow-runtime — facade crate
//!
//! Single import surface for the `flow-*` family, plus [`Runtime`]: an
//! opt-in convenience wrapper around [`flow_engine::Engine`] that serializes
//! `start_session`/`process_input` per session with a `tokio::sync::Mutex`
//! map, for callers who would rather the runtime enforced §5's
//! one-run-loop-per-session rule than do it themselves.
//!
//! Mirrors the teacher's `neuron` umbrella crate: re-export the satellite
//! crates behind feature flags, plus a `prelude` for the happy path.

#[cfg(feature = "state-fs")]
pub use flow_state_fs;
#[cfg(feature = "state-memory")]
pub use flow_state_memory;

pub use flow_core;
pub use flow_engine;
pub use flow_events;
pub use flow_handlers;

/// Happy-path imports for composing a flow runtime.
pub mod prelude {
    pub use flow_core::{
        AiService, ErrorCode, Event, EventSubscriber, Flow, FlowError, FlowId, KnowledgeService,
        Node, NodeId, NodeResult, Services, Session, SessionId, SessionStatus, SessionStore,
        ToolService,
    };
    pub use flow_engine::{Engine, EngineConfig, EngineError};
    pub use flow_events::EventBus;
    pub use flow_handlers::{Executor, HandlerRegistry, NodeHandler};

    #[cfg(feature = "state-memory")]
    pub use flow_state_memory::MemoryStore;

    #[cfg(feature = "state-fs")]
    pub use flow_state_fs::FsStore;
}

use flow_core::{Flow, Session, SessionId};
use flow_engine::{Engine, EngineError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex as AsyncMutex;

/// Wraps an [`Engine`] with an opt-in per-session lock map, so
/// [`Runtime::run_serialized`] guarantees at most one
/// `start_session`/`process_input` call is in flight for a given
/// [`SessionId`] at a time — the concurrency contract §5 asks callers to
/// uphold themselves, enforced here instead for callers who'd rather not.
///
/// Using [`Runtime::engine`] directly opts back out of this guarantee; the
/// wrapper never takes exclusive ownership away from callers who already
/// serialize per session upstream (an HTTP framework routing by session id
/// to a single worker, for instance).
pub struct Runtime {
    engine: Engine,
    locks: StdMutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>,
}

impl Runtime {
    /// Wrap an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Borrow the underlying engine for calls that don't need the
    /// per-session lock (e.g. `get_session`, `end_session`, which don't
    /// mutate via the run loop).
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn lock_for(&self, session_id: &SessionId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(session_id.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Start a session. New sessions have no id yet to key a lock by, so
    /// this simply delegates — the lock only matters once a session exists
    /// and might be resumed concurrently.
    pub async fn start_session(&self, flow: &Flow) -> Result<Session, EngineError> {
        self.engine.start_session(flow).await
    }

    /// Resume a session, holding its per-session lock for the duration of
    /// the run loop so a concurrent call for the same id blocks instead of
    /// racing.
    pub async fn run_serialized(
        &self,
        flow: &Flow,
        session_id: &SessionId,
        input: impl Into<String>,
    ) -> Result<Session, EngineError> {
        let lock = self.lock_for(session_id);
        let _guard = lock.lock().await;
        self.engine.process_input(flow, session_id, input).await
    }

    /// Drop a session's lock entry once it's known to be finished, so the
    /// lock map doesn't grow unboundedly across a long-lived runtime. Safe
    /// to call even if another call currently holds the lock; the entry is
    /// just removed from the map, not invalidated out from under the
    /// holder's `Arc`.
    pub fn forget_session(&self, session_id: &SessionId) {
        self.locks.lock().expect("lock map poisoned").remove(session_id);
    }
}

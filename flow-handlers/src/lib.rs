#![deny(missing_docs)]
//! # flow-handlers — per-node-kind execution semantics
//!
//! One [`NodeHandler`] implementation per [`flow_core::NodeKind`], dispatched
//! by [`executor::HandlerRegistry`] through a direct map lookup rather than
//! virtual dispatch over the node enum itself (`flow-core::node` already
//! makes that design choice explicit). Each handler is a pure function of
//! `(node, session, input, services)` that returns the
//! [`flow_core::NodeResult`] describing what should happen; it never mutates
//! the session itself, mirroring the teacher's effect-returning operator
//! shape (`neuron-op-react::ReactOperator::execute`,
//! `neuron-op-single-shot::SingleShotOperator::execute`).

use async_trait::async_trait;
use flow_core::{Node, NodeResult, Services, Session};

pub mod error;
pub mod executor;
pub mod handlers;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use error::HandlerError;
pub use executor::{Executor, HandlerRegistry};

/// One node kind's execution semantics.
///
/// `input` is `Some` only on the resuming call into a Collect-Input node
/// that is currently `WaitingInput`; every other invocation passes `None`.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Execute this node for one session, producing the effects the engine
    /// should apply.
    async fn handle(
        &self,
        node: &Node,
        session: &Session,
        input: Option<&str>,
        services: &Services,
    ) -> Result<NodeResult, HandlerError>;
}

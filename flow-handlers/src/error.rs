//! [`HandlerError`] — failures a handler implementation itself raises,
//! distinct from the business-level [`flow_core::FlowError`] a handler may
//! legitimately attach to a successful [`flow_core::NodeResult`].
//!
//! A `HandlerError` means the handler could not produce a `NodeResult` at
//! all (wrong config variant reached it, an upstream service call failed in
//! a way the handler has no policy for). The [`crate::executor::Executor`]
//! catches these and folds them into a fatal `NodeResult` so the run loop
//! never has to distinguish "handler raised" from "handler returned an
//! error result".

use flow_core::ServiceError;
use thiserror::Error;

/// Failures raised by a [`crate::NodeHandler`] implementation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The executor dispatched a node whose `config` variant did not match
    /// the handler's expected kind. Indicates a bug in
    /// [`crate::executor::HandlerRegistry`] registration, not a flow-authoring
    /// error — a well-formed registry never triggers this.
    #[error("handler for {expected} received a node with config kind {actual:?}")]
    ConfigMismatch {
        /// The kind this handler was registered for.
        expected: &'static str,
        /// The kind of config the node actually carried.
        actual: flow_core::NodeKind,
    },

    /// A service call the handler had no recovery policy for failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

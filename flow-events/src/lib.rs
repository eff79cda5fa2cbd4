#![deny(missing_docs)]
//! Event bus and subscriber composition for the conversational flow runtime.
//!
//! The [`EventBus`] fans a lifecycle [`flow_core::Event`] out to every
//! registered subscriber, in subscription order. Unlike a hook pipeline,
//! nothing here can intervene in the run loop — subscribers observe, they
//! don't decide — so there is no short-circuiting action to return; every
//! subscriber sees every event. A subscriber that errors is logged and
//! skipped; it never aborts the run (§4.7, §9 of `SPEC_FULL.md`).

use flow_core::events::{Event, EventSubscriber};
use std::sync::Arc;

/// A registry that fans events out to an ordered pipeline of subscribers.
///
/// Subscribers are called in the order they were registered. An error from
/// one subscriber does not prevent later subscribers from seeing the event.
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBus {
    /// Create a new empty event bus.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Returns its index, usable with [`Self::unsubscribe`].
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) -> usize {
        self.subscribers.push(subscriber);
        self.subscribers.len() - 1
    }

    /// Remove a previously registered subscriber by index. A no-op if the
    /// index is out of range or was already removed.
    pub fn unsubscribe(&mut self, index: usize) {
        if index < self.subscribers.len() {
            self.subscribers.remove(index);
        }
    }

    /// Emit an event to every registered subscriber, in order. Subscriber
    /// errors are caught, logged via `tracing::warn!`, and do not stop
    /// dispatch to the remaining subscribers.
    pub async fn emit(&self, event: &Event) {
        for subscriber in &self.subscribers {
            if let Err(err) = subscriber.on_event(event).await {
                tracing::warn!(error = %err, "event subscriber failed, continuing");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

//! RecordingSubscriber — records every event it sees, for test assertions.

use crate::events::{Event, EventSubscriber};
use async_trait::async_trait;
use std::sync::Mutex;

/// An [`EventSubscriber`] that records every event it receives and always
/// succeeds. Mirrors the teacher's `LoggingHook` test double.
pub struct RecordingSubscriber {
    events: Mutex<Vec<Event>>,
}

impl RecordingSubscriber {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// A snapshot of every event recorded so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for RecordingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSubscriber for RecordingSubscriber {
    async fn on_event(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

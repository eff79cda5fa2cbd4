//! MockToolService — a queued-response test double for [`crate::ToolService`].

use crate::error::ServiceError;
use crate::services::{ToolExecutionResult, ToolService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One captured `execute` call, for assertions.
#[derive(Debug, Clone)]
pub struct CapturedToolCall {
    /// The tool id invoked.
    pub tool_id: String,
    /// The interpolated inputs passed.
    pub inputs: serde_json::Value,
}

/// A test double for [`ToolService`] that returns pre-queued responses in
/// FIFO order and records every call it receives.
pub struct MockToolService {
    responses: Mutex<VecDeque<Result<ToolExecutionResult, ServiceError>>>,
    calls: Mutex<Vec<CapturedToolCall>>,
    call_count: AtomicUsize,
}

impl MockToolService {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Build a mock that always returns the given successful result.
    pub fn with_result(result: ToolExecutionResult) -> Self {
        let mock = Self::new();
        mock.push_result(result);
        mock
    }

    /// Queue a successful response.
    pub fn push_result(&self, result: ToolExecutionResult) {
        self.responses.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a failing response.
    pub fn push_error(&self, error: ServiceError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of `execute` calls received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every call received so far, in order.
    pub fn calls(&self) -> Vec<CapturedToolCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockToolService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolService for MockToolService {
    async fn execute(
        &self,
        tool_id: &str,
        inputs: &serde_json::Value,
        _timeout_ms: Option<u64>,
    ) -> Result<ToolExecutionResult, ServiceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(CapturedToolCall {
            tool_id: tool_id.to_string(),
            inputs: inputs.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::NonRetryable("no queued response".into())))
    }
}

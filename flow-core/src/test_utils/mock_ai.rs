//! MockAiService — a queued-response test double for [`crate::AiService`].

use crate::error::ServiceError;
use crate::node::ModelConfig;
use crate::services::{AiService, ClassifyResult, IntentOption};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One captured `classify` call, for assertions.
#[derive(Debug, Clone)]
pub struct CapturedClassifyCall {
    /// The system prompt passed.
    pub system_prompt: String,
    /// The user message passed.
    pub user_message: String,
    /// The intent names offered.
    pub intent_names: Vec<String>,
}

/// A test double for [`AiService`] that returns pre-queued responses in
/// FIFO order and records every call it receives.
///
/// Modeled on the `MockProvider` response-queue pattern used throughout this
/// codebase family's operator test suites: a `Mutex<VecDeque<_>>` of
/// responses, a call-capture `Mutex<Vec<_>>`, and an atomic call counter.
pub struct MockAiService {
    responses: Mutex<VecDeque<Result<ClassifyResult, ServiceError>>>,
    calls: Mutex<Vec<CapturedClassifyCall>>,
    call_count: AtomicUsize,
}

impl MockAiService {
    /// Create a mock with no queued responses. Calling `classify` on an
    /// empty queue returns `ServiceError::NonRetryable`.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Build a mock that always returns the given successful result.
    pub fn with_result(result: ClassifyResult) -> Self {
        let mock = Self::new();
        mock.push_result(result);
        mock
    }

    /// Queue a successful response.
    pub fn push_result(&self, result: ClassifyResult) {
        self.responses.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a failing response.
    pub fn push_error(&self, error: ServiceError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of `classify` calls received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every call received so far, in order.
    pub fn calls(&self) -> Vec<CapturedClassifyCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiService for MockAiService {
    async fn classify(
        &self,
        system_prompt: &str,
        user_message: &str,
        intents: &[IntentOption],
        _model: Option<&ModelConfig>,
    ) -> Result<ClassifyResult, ServiceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(CapturedClassifyCall {
            system_prompt: system_prompt.to_string(),
            user_message: user_message.to_string(),
            intent_names: intents.iter().map(|i| i.name.clone()).collect(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::NonRetryable("no queued response".into())))
    }
}

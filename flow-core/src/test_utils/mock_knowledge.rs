//! MockKnowledgeService — a queued-response test double for
//! [`crate::KnowledgeService`].

use crate::error::ServiceError;
use crate::services::{KnowledgeSearchResult, KnowledgeService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A test double for [`KnowledgeService`] that returns pre-queued responses
/// in FIFO order.
pub struct MockKnowledgeService {
    responses: Mutex<VecDeque<Result<KnowledgeSearchResult, ServiceError>>>,
    call_count: AtomicUsize,
}

impl MockKnowledgeService {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Build a mock that always returns the given successful result.
    pub fn with_result(result: KnowledgeSearchResult) -> Self {
        let mock = Self::new();
        mock.push_result(result);
        mock
    }

    /// Queue a successful response.
    pub fn push_result(&self, result: KnowledgeSearchResult) {
        self.responses.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a failing response.
    pub fn push_error(&self, error: ServiceError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of `search` calls received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockKnowledgeService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeService for MockKnowledgeService {
    async fn search(
        &self,
        _knowledge_base_id: &str,
        _query: &str,
        _top_k: u32,
        _min_score: f64,
    ) -> Result<KnowledgeSearchResult, ServiceError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::NonRetryable("no queued response".into())))
    }
}

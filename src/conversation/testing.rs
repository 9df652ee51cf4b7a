//! Mock transports for testing
//!
//! These let store tests run without a backend.

use crate::transport::{
    BatchInfo, ChatReply, ChatRequest, ChatTransport, HealthStatus, TransportError,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

// ============================================================================
// Mock Transport
// ============================================================================

/// Transport that answers from a queue
#[allow(dead_code)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<ChatReply, TransportError>>>,
    always_fail: bool,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            always_fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Transport that rejects every request
    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Self::new()
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: ChatReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<ChatReply, TransportError> {
        if self.always_fail {
            return Err(TransportError::connect("Connection refused"));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::other("No mock reply queued")))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_reply()
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: "mock-backend".to_string(),
        })
    }

    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError> {
        Err(TransportError::status(404, format!("Batch {batch_code} not found")))
    }
}

// ============================================================================
// Gated Mock Transport (for pending and close testing)
// ============================================================================

/// Transport that holds each request until the test releases it
pub struct GatedMockTransport {
    inner: MockTransport,
    started: Notify,
    gate: Notify,
}

#[allow(dead_code)]
impl GatedMockTransport {
    pub fn new() -> Self {
        Self {
            inner: MockTransport::new(),
            started: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub fn queue_reply(&self, reply: ChatReply) {
        self.inner.queue_reply(reply);
    }

    pub fn queue_error(&self, error: TransportError) {
        self.inner.queue_error(error);
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.inner.recorded_requests()
    }

    /// Wait until a request has reached the transport
    pub async fn wait_for_request(&self) {
        self.started.notified().await;
    }

    /// Let the held request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ChatTransport for GatedMockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        // notify_one stores a permit, so the test may wait before or after
        self.started.notify_one();
        self.gate.notified().await;
        self.inner.next_reply()
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        self.inner.health().await
    }

    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError> {
        self.inner.batch_info(batch_code).await
    }
}

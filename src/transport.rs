//! Transport collaborator
//!
//! The conversation core only knows the `ChatTransport` trait. Production
//! wires in `HttpTransport` (wrapped in `LoggingTransport`); tests inject
//! mocks.

mod error;
mod http;
mod types;

pub use error::TransportError;
pub use http::HttpTransport;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// One request, one complete reply
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a chat query
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;

    /// Backend liveness probe (diagnostics only)
    async fn health(&self) -> Result<HealthStatus, TransportError>;

    /// Look up a batch directly (diagnostics only)
    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        (**self).send(request).await
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        (**self).health().await
    }

    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError> {
        (**self).batch_info(batch_code).await
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: ChatTransport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: ChatTransport> ChatTransport for LoggingTransport<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        tracing::debug!(
            session_id = %request.session_id,
            query_len = request.query.len(),
            "Chat request"
        );
        let start = Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    intent = reply.intent.as_deref().unwrap_or("none"),
                    has_data = reply.data.is_some(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        let result = self.inner.health().await;
        match &result {
            Ok(health) => tracing::info!(status = %health.status, service = %health.service, "Health check"),
            Err(e) => tracing::warn!(kind = e.kind.as_str(), error = %e.message, "Health check failed"),
        }
        result
    }

    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError> {
        let result = self.inner.batch_info(batch_code).await;
        if let Err(e) = &result {
            tracing::warn!(batch_code, kind = e.kind.as_str(), error = %e.message, "Batch lookup failed");
        }
        result
    }
}

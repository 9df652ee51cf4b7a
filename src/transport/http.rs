//! reqwest-backed transport for the assistant backend

use super::types::{BatchInfo, ChatReply, ChatRequest, ErrorBody, HealthStatus};
use super::{ChatTransport, TransportError};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP transport talking JSON to the backend
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Batch lookup URL with the code as a single escaped path segment
    fn batch_url(&self, batch_code: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.url("/api/v1/batch"))
            .map_err(|e| TransportError::other(format!("Invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| TransportError::other("Invalid API URL: cannot hold a path"))?
            .push(batch_code);
        Ok(url)
    }

    /// Read the body and decode it, mapping non-2xx statuses to errors
    async fn decode<T: DeserializeOwned>(
        context: &str,
        response: Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(context, &e))?;

        if !status.is_success() {
            return Err(TransportError::status(
                status.as_u16(),
                format!("{context}: HTTP {status}: {}", error_detail(&body)),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| TransportError::decode(format!("{context}: invalid response body: {e}")))
    }
}

/// Pull `detail` out of an error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let context = "Failed to send message";
        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(context, &e))?;

        Self::decode(context, response).await
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        let context = "Health check failed";
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(context, &e))?;

        Self::decode(context, response).await
    }

    async fn batch_info(&self, batch_code: &str) -> Result<BatchInfo, TransportError> {
        let context = "Failed to get batch info";
        let response = self
            .client
            .get(self.batch_url(batch_code)?)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(context, &e))?;

        Self::decode(context, response).await
    }
}

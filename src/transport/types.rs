//! Wire types for the assistant backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: session_id.into(),
        }
    }
}

/// Successful `/chat` response.
///
/// Only `message`, `intent` and `data` feed the conversation; the rest is
/// accepted so a full backend payload deserializes cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
impl ChatReply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
            ..Self::default()
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>, data: Map<String, Value>) -> Self {
        self.intent = Some(intent.into());
        self.data = Some(data);
        self
    }
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

/// `GET /api/v1/batch/{code}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    pub batch_code: String,
    pub location: String,
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub handler: Option<String>,
}

/// Error body FastAPI-style backends send with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Value,
}

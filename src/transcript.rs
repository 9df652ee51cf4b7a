//! Transcript data model
//!
//! Messages are append-only. Ids come from a per-transcript counter so they
//! sort in creation order and are never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Greeting seeded into a fresh conversation
pub const WELCOME_TEXT: &str = "Hi! I'm your ERP assistant. I can help you track batches, \
find locations, and check statuses. Try asking me:\n\n\
• Where is batch VDT-052025-A?\n\
• Who handled batch VDT-052025-A?\n\
• Show me batch history for VDT-052025-A";

/// Monotonic message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// Message body, resolved once when the message is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    Structured(Map<String, Value>),
}

impl MessageContent {
    pub fn text(s: impl Into<String>) -> Self {
        MessageContent::Text(s.into())
    }

    /// Resolve a raw JSON payload field into typed content.
    ///
    /// Objects stay structured, strings become text, and any other JSON kind
    /// is kept as its JSON text. Returns `None` for null so callers can apply
    /// their own fallback.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(MessageContent::Text(s)),
            Value::Object(map) => Some(MessageContent::Structured(map)),
            other => Some(MessageContent::Text(other.to_string())),
        }
    }

    /// Canonical display string (structured content is pretty-printed)
    pub fn display_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Structured(map) => serde_json::to_string_pretty(map)
                .unwrap_or_else(|_| Value::Object(map.clone()).to_string()),
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// Fields for a message that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub role: Role,
    pub content: MessageContent,
    pub intent: Option<String>,
    pub data: Option<Map<String, Value>>,
}

impl NewMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::text(text),
            intent: None,
            data: None,
        }
    }

    pub fn assistant(content: MessageContent) -> Self {
        Self {
            role: Role::Assistant,
            content,
            intent: None,
            data: None,
        }
    }

    pub fn with_intent(mut self, intent: Option<String>, data: Option<Map<String, Value>>) -> Self {
        self.intent = intent;
        self.data = data;
        self
    }
}

/// Ordered, append-only message sequence
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    last_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript pre-seeded with the assistant greeting
    pub fn with_welcome() -> Self {
        let mut transcript = Self::new();
        transcript.append(NewMessage::assistant(MessageContent::text(WELCOME_TEXT)));
        transcript
    }

    /// Assign the next id and a creation timestamp, then append
    pub fn append(&mut self, new: NewMessage) -> Message {
        self.last_id += 1;
        let message = Message {
            id: MessageId(self.last_id),
            role: new.role,
            content: new.content,
            timestamp: Utc::now(),
            intent: new.intent,
            data: new.data,
        };
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

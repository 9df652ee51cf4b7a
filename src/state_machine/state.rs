//! Conversation state types

/// Conversation state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatState {
    /// Ready for user input, nothing in flight
    #[default]
    Idle,

    /// One query sent, its reply (or failure) not yet appended
    AwaitingReply { query: String },
}

impl ChatState {
    /// True while a request is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatState::AwaitingReply { .. })
    }

    /// Text of the query in flight
    pub fn query(&self) -> Option<&str> {
        match self {
            ChatState::Idle => None,
            ChatState::AwaitingReply { query } => Some(query),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChatState::Idle => "idle",
            ChatState::AwaitingReply { .. } => "awaiting_reply",
        }
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    /// Correlation token handed to the backend unchanged
    pub session_id: String,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// Context with a freshly generated session id
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string())
    }
}

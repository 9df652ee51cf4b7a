//! Events that can occur in a conversation

use crate::transport::ChatReply;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit { text: String },

    // Transport events
    ReplyReceived { reply: ChatReply },
    /// Any transport failure; the subtype is not part of the state machine
    ReplyFailed,
}

impl Event {
    pub fn user_submit(text: impl Into<String>) -> Self {
        Event::UserSubmit { text: text.into() }
    }
}

//! Effects produced by state transitions

use crate::transcript::NewMessage;
use crate::transport::ChatRequest;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage(NewMessage),

    /// Issue the request to the transport
    SendQuery(ChatRequest),

    /// Show or clear the error banner
    SetErrorBanner(Option<String>),

    /// Tell subscribers the pending flag changed
    NotifyPending(bool),
}

impl Effect {
    pub fn append(message: NewMessage) -> Self {
        Effect::AppendMessage(message)
    }

    pub fn clear_banner() -> Self {
        Effect::SetErrorBanner(None)
    }

    pub fn show_banner(message: impl Into<String>) -> Self {
        Effect::SetErrorBanner(Some(message.into()))
    }
}

//! Pure state transition function
//!
//! Given the same inputs this always produces the same outputs. Message ids
//! and timestamps are assigned later, when the store appends.

use super::{ChatState, ConvContext, Effect, Event};
use crate::transcript::{MessageContent, NewMessage};
use crate::transport::{ChatReply, ChatRequest};
use thiserror::Error;

/// Assistant text when a reply carries no `message`
pub const NO_RESPONSE_TEXT: &str = "Sorry, no response";

/// Assistant text substituted for any transport failure
pub const APOLOGY_TEXT: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Banner shown after a failed send, cleared by the next accepted submit
pub const ERROR_BANNER_TEXT: &str = "Failed to send message. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for the previous reply")]
    AwaitingReply,
    #[error("Reply arrived with no request in flight")]
    UnexpectedReply,
}

/// Pure transition function
pub fn transition(
    state: &ChatState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Busy: one request in flight per conversation
        (ChatState::AwaitingReply { .. }, Event::UserSubmit { .. }) => {
            Err(TransitionError::AwaitingReply)
        }

        (ChatState::Idle, Event::UserSubmit { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyMessage);
            }

            let request = ChatRequest::new(text.clone(), context.session_id.clone());
            Ok(TransitionResult::new(ChatState::AwaitingReply { query: text.clone() })
                .with_effect(Effect::clear_banner())
                .with_effect(Effect::append(NewMessage::user(text)))
                .with_effect(Effect::NotifyPending(true))
                .with_effect(Effect::SendQuery(request)))
        }

        (ChatState::AwaitingReply { .. }, Event::ReplyReceived { reply }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::append(reply_message(reply)))
                .with_effect(Effect::NotifyPending(false)))
        }

        (ChatState::AwaitingReply { .. }, Event::ReplyFailed) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::append(NewMessage::assistant(MessageContent::text(
                    APOLOGY_TEXT,
                ))))
                .with_effect(Effect::show_banner(ERROR_BANNER_TEXT))
                .with_effect(Effect::NotifyPending(false)))
        }

        (ChatState::Idle, Event::ReplyReceived { .. } | Event::ReplyFailed) => {
            Err(TransitionError::UnexpectedReply)
        }
    }
}

/// Build the assistant message from a reply, verbatim apart from the
/// missing-message fallback
fn reply_message(reply: ChatReply) -> NewMessage {
    let content = reply
        .message
        .and_then(MessageContent::from_value)
        .unwrap_or_else(|| MessageContent::text(NO_RESPONSE_TEXT));

    NewMessage::assistant(content).with_intent(reply.intent, reply.data)
}

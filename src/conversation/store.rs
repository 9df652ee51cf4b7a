//! Conversation store executor

use crate::state_machine::{transition, ChatState, ConvContext, Effect, Event, TransitionError};
use crate::transcript::{Message, Transcript};
use crate::transport::{ChatRequest, ChatTransport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Change notifications for subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    MessageAppended(Message),
    PendingChanged(bool),
}

/// How a `submit` call ended. Never an error: transport failures surface as
/// an assistant message, bad input is simply ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User message and exactly one assistant message were appended
    Completed,
    /// Nothing happened (blank text or a request already in flight)
    Rejected(TransitionError),
    /// The store was closed before the call
    Closed,
    /// The store was closed while the request was in flight; the reply was
    /// dropped
    Discarded,
}

/// Read-only view for display
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub messages: Vec<Message>,
    pub pending: bool,
    pub error_banner: Option<String>,
}

struct Session {
    state: ChatState,
    transcript: Transcript,
    error_banner: Option<String>,
}

struct Shared {
    context: ConvContext,
    session: Mutex<Session>,
    events_tx: broadcast::Sender<StoreEvent>,
    closed: CancellationToken,
}

/// The conversation store. Cheap to clone; clones share one conversation.
pub struct ConversationStore<T: ChatTransport + 'static> {
    shared: Arc<Shared>,
    transport: Arc<T>,
}

impl<T: ChatTransport + 'static> Clone for ConversationStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: ChatTransport + 'static> ConversationStore<T> {
    /// Empty conversation
    pub fn new(context: ConvContext, transport: T) -> Self {
        Self::from_transcript(context, transport, Transcript::new())
    }

    /// Conversation seeded with the assistant greeting
    pub fn with_welcome(context: ConvContext, transport: T) -> Self {
        Self::from_transcript(context, transport, Transcript::with_welcome())
    }

    fn from_transcript(context: ConvContext, transport: T, transcript: Transcript) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        tracing::info!(session_id = %context.session_id, welcome = !transcript.is_empty(), "Conversation created");
        Self {
            shared: Arc::new(Shared {
                context,
                session: Mutex::new(Session {
                    state: ChatState::Idle,
                    transcript,
                    error_banner: None,
                }),
                events_tx,
                closed: CancellationToken::new(),
            }),
            transport: Arc::new(transport),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.shared.context.session_id
    }

    /// Transport handle for diagnostics outside the conversation
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit user text.
    ///
    /// Appends the user message before the transport is called and the
    /// assistant message after it resolves. The reply is awaited on a
    /// detached task, so dropping this future never strands the
    /// conversation in the pending state.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if self.is_closed() {
            tracing::debug!(session_id = %self.session_id(), "Submit after close ignored");
            return SubmitOutcome::Closed;
        }

        let requests = match self.apply(Event::user_submit(text)) {
            Ok(requests) => requests,
            Err(e) => {
                tracing::debug!(session_id = %self.session_id(), reason = %e, "Submission ignored");
                return SubmitOutcome::Rejected(e);
            }
        };

        let mut outcome = SubmitOutcome::Completed;
        for request in requests {
            let store = self.clone();
            let reply_task = tokio::spawn(async move { store.complete(request).await });
            outcome = match reply_task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(session_id = %self.session_id(), error = %e, "Reply task failed");
                    SubmitOutcome::Discarded
                }
            };
        }
        outcome
    }

    /// Current transcript and flags
    pub fn snapshot(&self) -> Snapshot {
        let session = self.lock();
        Snapshot {
            messages: session.transcript.messages().to_vec(),
            pending: session.state.is_pending(),
            error_banner: session.error_banner.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Tear down. Replies still in flight are dropped.
    pub fn close(&self) {
        if !self.shared.closed.is_cancelled() {
            tracing::info!(session_id = %self.session_id(), "Conversation closed");
        }
        self.shared.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.is_cancelled()
    }

    /// Resolves once `close` has been called
    pub async fn closed(&self) {
        self.shared.closed.cancelled().await;
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one transition and its synchronous effects under the lock.
    /// Returns the requests the caller must issue once the lock is released.
    fn apply(&self, event: Event) -> Result<Vec<ChatRequest>, TransitionError> {
        let mut session = self.lock();
        let result = transition(&session.state, &self.shared.context, event)?;

        let old_state = std::mem::replace(&mut session.state, result.new_state);
        tracing::debug!(
            session_id = %self.session_id(),
            from = old_state.name(),
            to = session.state.name(),
            query = session.state.query().unwrap_or_default(),
            "State transition"
        );

        let mut requests = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::AppendMessage(new) => {
                    let message = session.transcript.append(new);
                    tracing::debug!(
                        id = %message.id,
                        role = ?message.role,
                        intent = message.intent.as_deref().unwrap_or("none"),
                        "Message appended"
                    );
                    // No subscribers is fine
                    let _ = self.shared.events_tx.send(StoreEvent::MessageAppended(message));
                }
                Effect::SendQuery(request) => requests.push(request),
                Effect::SetErrorBanner(banner) => session.error_banner = banner,
                Effect::NotifyPending(pending) => {
                    let _ = self.shared.events_tx.send(StoreEvent::PendingChanged(pending));
                }
            }
        }

        Ok(requests)
    }

    /// Await the transport and apply the completion event, unless the
    /// store is closed first.
    async fn complete(&self, request: ChatRequest) -> SubmitOutcome {
        let event = tokio::select! {
            biased;

            () = self.shared.closed.cancelled() => {
                tracing::debug!(session_id = %self.session_id(), "Conversation closed, reply dropped");
                return SubmitOutcome::Discarded;
            }

            result = self.transport.send(&request) => match result {
                Ok(reply) => Event::ReplyReceived { reply },
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session_id(),
                        kind = e.kind.as_str(),
                        error = %e,
                        "Chat request failed, showing apology"
                    );
                    Event::ReplyFailed
                }
            },
        };

        match self.apply(event) {
            Ok(_) => SubmitOutcome::Completed,
            Err(e) => {
                tracing::error!(session_id = %self.session_id(), reason = %e, "Completion rejected");
                SubmitOutcome::Rejected(e)
            }
        }
    }
}

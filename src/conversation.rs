//! Conversation store
//!
//! Owns the transcript and the pending gate for one UI session, and runs
//! the state machine's effects against an injected transport.

mod store;

#[cfg(test)]
pub mod testing;

pub use store::{ConversationStore, Snapshot, StoreEvent, SubmitOutcome};

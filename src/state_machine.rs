//! Message-exchange state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the conversation store feeds events in and executes the effects that
//! come back.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatState, ConvContext};
pub use transition::{transition, TransitionError};

//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::transcript::Role;
use crate::transport::ChatReply;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new("test-session")
}

/// Replay events from Idle, returning the final state and every accepted
/// transition's effects
fn run(events: Vec<Event>) -> (ChatState, Vec<Vec<Effect>>) {
    let ctx = test_context();
    let mut state = ChatState::Idle;
    let mut accepted = Vec::new();
    for event in events {
        if let Ok(result) = transition(&state, &ctx, event) {
            state = result.new_state;
            accepted.push(result.effects);
        }
    }
    (state, accepted)
}

fn appended_roles(effects: &[Effect]) -> Vec<Role> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendMessage(m) => Some(m.role),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 |?]{1,30}",
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_message_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        "[a-zA-Z |\n]{0,40}".prop_map(|s| Some(Value::String(s))),
        "[a-z]{1,8}".prop_map(|k| {
            let mut map = Map::new();
            map.insert(k, json!("v"));
            Some(Value::Object(map))
        }),
        any::<i64>().prop_map(|n| Some(json!(n))),
    ]
}

fn arb_reply() -> impl Strategy<Value = ChatReply> {
    (
        arb_message_value(),
        proptest::option::of("[a-z_]{1,16}"),
    )
        .prop_map(|(message, intent)| ChatReply {
            message,
            intent,
            ..ChatReply::default()
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::UserSubmit { text }),
        arb_reply().prop_map(|reply| Event::ReplyReceived { reply }),
        Just(Event::ReplyFailed),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Every accepted transition appends at most one message, and user and
    // assistant appends strictly alternate starting with the user.
    #[test]
    fn prop_appends_alternate(events in proptest::collection::vec(arb_event(), 0..40)) {
        let (state, accepted) = run(events);

        let roles: Vec<Role> = accepted.iter().flat_map(|e| appended_roles(e)).collect();
        for effects in &accepted {
            prop_assert!(appended_roles(effects).len() <= 1);
        }
        for (i, role) in roles.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(*role, expected, "roles out of order: {:?}", roles);
        }

        // Pending exactly when the last append was a user message
        prop_assert_eq!(state.is_pending(), roles.last() == Some(&Role::User));
    }

    // A query is only ever sent together with the user append, and never
    // twice without a reply in between.
    #[test]
    fn prop_single_request_in_flight(events in proptest::collection::vec(arb_event(), 0..40)) {
        let (_, accepted) = run(events);

        let mut in_flight = false;
        for effects in &accepted {
            let sends = effects.iter().filter(|e| matches!(e, Effect::SendQuery(_))).count();
            let roles = appended_roles(effects);
            if sends > 0 {
                prop_assert_eq!(sends, 1);
                prop_assert!(!in_flight, "second request while one in flight");
                prop_assert_eq!(roles, vec![Role::User]);
                in_flight = true;
            } else if !roles.is_empty() {
                prop_assert!(in_flight);
                in_flight = false;
            }
        }
    }

    // Submissions while awaiting are always rejected and leave state alone
    #[test]
    fn prop_busy_rejects_submit(query in "[a-z]{1,10}", text in arb_text()) {
        let state = ChatState::AwaitingReply { query };
        let result = transition(&state, &test_context(), Event::UserSubmit { text });
        prop_assert_eq!(result.unwrap_err(), TransitionError::AwaitingReply);
    }

    // Whitespace-only input never leaves Idle
    #[test]
    fn prop_blank_submit_is_rejected(text in "[ \t\r\n]{0,10}") {
        let result = transition(&ChatState::Idle, &test_context(), Event::UserSubmit { text });
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyMessage);
    }

    // Both completions return to Idle and clear pending
    #[test]
    fn prop_completion_returns_to_idle(query in "[a-z]{1,10}", reply in proptest::option::of(arb_reply())) {
        let state = ChatState::AwaitingReply { query };
        let event = match reply {
            Some(reply) => Event::ReplyReceived { reply },
            None => Event::ReplyFailed,
        };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, ChatState::Idle);
        prop_assert_eq!(result.effects.last(), Some(&Effect::NotifyPending(false)));
    }
}

use std::collections::HashSet;

use proptest::prelude::*;

use crate::session::event::{SessionEvent, ToolResultPayload};
use crate::session::message::ToolName;
use crate::session::reduce::reduce;
use crate::session::state::SessionState;
use crate::session::types::{SessionId, ToolCallId};

fn test_state() -> SessionState {
    SessionState::new(SessionId::from_string("s1"))
}

fn arb_tool_call_id() -> impl Strategy<Value = ToolCallId> {
    // Small pool so duplicate/race cases are actually generated.
    (0u8..4).prop_map(|n| ToolCallId::from_string(format!("t{n}")))
}

fn arb_tool_name() -> impl Strategy<Value = ToolName> {
    prop_oneof![
        Just(ToolName::GenerateImage),
        Just(ToolName::WritePlan),
        Just(ToolName::Finish),
        Just(ToolName::Other("transfer_to_planner".to_string())),
    ]
}

/// Incremental (non-snapshot) stream events.
fn arb_stream_event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(|text| SessionEvent::Delta {
            session_id: None,
            text,
        }),
        (arb_tool_call_id(), arb_tool_name()).prop_map(|(id, name)| SessionEvent::ToolCall {
            session_id: None,
            id,
            name,
        }),
        (arb_tool_call_id(), "[a-z{}\":]{0,8}").prop_map(|(id, text)| {
            SessionEvent::ToolCallArguments {
                session_id: None,
                id,
                text,
            }
        }),
        (arb_tool_call_id(), arb_tool_name()).prop_map(|(id, name)| {
            SessionEvent::ToolCallPendingConfirmation {
                session_id: None,
                id,
                name,
                arguments: "{}".to_string(),
            }
        }),
        arb_tool_call_id().prop_map(|id| SessionEvent::ToolCallConfirmed {
            session_id: None,
            id,
        }),
        arb_tool_call_id().prop_map(|id| SessionEvent::ToolCallCancelled {
            session_id: None,
            id,
        }),
        (arb_tool_call_id(), "[a-z]{0,8}").prop_map(|(id, content)| {
            SessionEvent::ToolCallResult {
                session_id: None,
                id,
                message: ToolResultPayload {
                    tool_call_id: None,
                    content,
                },
            }
        }),
        Just(SessionEvent::Done { session_id: None }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// No two tool-call entries ever share an id, whatever the arrival
    /// order and duplication of creation events.
    #[test]
    fn prop_tool_call_ids_stay_unique(events in prop::collection::vec(arb_stream_event(), 0..40)) {
        let mut state = test_state();
        for event in events {
            let _ = reduce(&mut state, event);
        }

        let mut seen = HashSet::new();
        for message in &state.messages {
            for tool_call in message.tool_calls() {
                prop_assert!(
                    seen.insert(tool_call.id.clone()),
                    "duplicate tool call id {}",
                    tool_call.id
                );
            }
        }
    }

    /// The reducer is a deterministic function of the event sequence.
    #[test]
    fn prop_reducer_is_deterministic(events in prop::collection::vec(arb_stream_event(), 0..30)) {
        let mut state1 = test_state();
        let mut state2 = test_state();
        for event in events {
            let effects1 = reduce(&mut state1, event.clone());
            let effects2 = reduce(&mut state2, event);
            prop_assert_eq!(effects1, effects2);
        }
        prop_assert_eq!(state1, state2);
    }

    /// Incremental events only ever append; nothing removes a message
    /// short of a snapshot replacement.
    #[test]
    fn prop_stream_events_never_shrink_the_transcript(
        events in prop::collection::vec(arb_stream_event(), 0..40),
    ) {
        let mut state = test_state();
        let mut previous_len = 0;
        for event in events {
            let _ = reduce(&mut state, event);
            prop_assert!(state.messages.len() >= previous_len);
            previous_len = state.messages.len();
        }
    }

    /// Applying a snapshot always lands on the same transcript as
    /// building fresh from that snapshot, no matter what incremental
    /// state preceded it.
    #[test]
    fn prop_snapshot_replacement_is_history_independent(
        prefix in prop::collection::vec(arb_stream_event(), 0..30),
        snapshot_seed in prop::collection::vec(arb_stream_event(), 0..20),
    ) {
        // Build an arbitrary but well-formed message list.
        let mut seed_state = test_state();
        for event in snapshot_seed {
            let _ = reduce(&mut seed_state, event);
        }
        let snapshot = seed_state.messages;

        let mut incremental = test_state();
        for event in prefix {
            let _ = reduce(&mut incremental, event);
        }
        let pending_before = incremental.pending;
        let confirmations_before = incremental.pending_confirmations.clone();
        let _ = reduce(&mut incremental, SessionEvent::AllMessages {
            session_id: None,
            messages: snapshot.clone(),
        });

        let mut fresh = test_state();
        let _ = reduce(&mut fresh, SessionEvent::AllMessages {
            session_id: None,
            messages: snapshot,
        });

        prop_assert_eq!(&incremental.messages, &fresh.messages);
        prop_assert_eq!(&incremental.merged_tool_results, &fresh.merged_tool_results);
        // Snapshot replacement touches the transcript and merged set
        // only: the pending indicator and the confirmation gate carry
        // over from the incremental run, and progress is dropped.
        prop_assert_eq!(incremental.pending, pending_before);
        prop_assert_eq!(&incremental.pending_confirmations, &confirmations_before);
        prop_assert_eq!(incremental.progress, None);
    }

    /// While an id awaits confirmation its argument string is frozen.
    #[test]
    fn prop_arguments_frozen_while_pending(fragments in prop::collection::vec("[a-z]{1,6}", 1..10)) {
        let mut state = test_state();
        let id = ToolCallId::from_string("t1");
        let _ = reduce(&mut state, SessionEvent::ToolCallPendingConfirmation {
            session_id: None,
            id: id.clone(),
            name: ToolName::GenerateImage,
            arguments: r#"{"prompt":"cat"}"#.to_string(),
        });

        for fragment in fragments {
            let _ = reduce(&mut state, SessionEvent::ToolCallArguments {
                session_id: None,
                id: id.clone(),
                text: fragment,
            });
        }

        let tool_call = state.find_tool_call(&id);
        prop_assert_eq!(
            tool_call.map(|tc| tc.function.arguments.as_str()),
            Some(r#"{"prompt":"cat"}"#)
        );
    }
}

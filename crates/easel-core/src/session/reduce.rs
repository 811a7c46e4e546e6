//! The message-assembly reducer.
//!
//! One synchronous, total, non-throwing transition per event kind. The
//! reducer owns the message sequence outright: events arrive in
//! transport order and are applied in that order, with no reordering and
//! no timestamp sorting. Messages are only ever appended or mutated in
//! place; the single exception is the `all_messages` snapshot, which
//! replaces the sequence wholesale.

use strum_macros::Display;

use crate::session::event::{SessionEvent, ToolResultPayload};
use crate::session::merge::merge_tool_results;
use crate::session::message::{
    Message, MessageContent, ToolCall, ToolName, TOOL_CALL_CANCELLED_RESULT,
};
use crate::session::state::{Pending, SessionState, ToolCallProgress};
use crate::session::types::ToolCallId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Side effects a transition asks the runtime to perform. The reducer
/// itself never does I/O; transport `error`/`info` events surface as
/// one-time notices for ephemeral display.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify {
        level: NoticeLevel,
        message: String,
    },
}

/// Apply one event to the session state. Never fails: abnormal input
/// degrades to a no-op or a notice, never to an error.
pub fn reduce(state: &mut SessionState, event: SessionEvent) -> Vec<Effect> {
    match event {
        SessionEvent::Delta { text, .. } => handle_delta(state, text),

        SessionEvent::ToolCall { id, name, .. } => handle_tool_call(state, id, name),

        SessionEvent::ToolCallArguments { id, text, .. } => {
            handle_tool_call_arguments(state, &id, &text)
        }

        SessionEvent::ToolCallPendingConfirmation {
            id,
            name,
            arguments,
            ..
        } => handle_tool_call_pending_confirmation(state, id, name, arguments),

        SessionEvent::ToolCallConfirmed { id, .. } => handle_tool_call_confirmed(state, id),

        SessionEvent::ToolCallCancelled { id, .. } => handle_tool_call_cancelled(state, &id),

        SessionEvent::ToolCallResult { id, message, .. } => {
            handle_tool_call_result(state, &id, &message)
        }

        SessionEvent::ToolCallProgress {
            tool_call_id,
            update,
            ..
        } => {
            state.progress = Some(ToolCallProgress {
                tool_call_id,
                update,
            });
            vec![]
        }

        SessionEvent::ImageGenerated { image_url, .. } => {
            handle_media_generated(state, format!("![Generated Image]({image_url})"))
        }

        SessionEvent::VideoGenerated { video_url, .. } => {
            handle_media_generated(state, format!("[Generated Video]({video_url})"))
        }

        SessionEvent::AllMessages { messages, .. } => handle_all_messages(state, messages),

        SessionEvent::Done { .. } => {
            state.pending = None;
            state.progress = None;
            vec![]
        }

        SessionEvent::Error { error, .. } => {
            state.pending = None;
            vec![Effect::Notify {
                level: NoticeLevel::Error,
                message: error,
            }]
        }

        SessionEvent::Info { info, .. } => vec![Effect::Notify {
            level: NoticeLevel::Info,
            message: info,
        }],
    }
}

/// Coalesce the fragment into a trailing text-bearing assistant message;
/// a trailing message with tool calls (or no content) starts a new one.
fn handle_delta(state: &mut SessionState, fragment: String) -> Vec<Effect> {
    state.pending = Some(Pending::Text);

    let appended = match state.messages.last_mut() {
        Some(Message::Assistant {
            content: Some(content),
            tool_calls: None,
        }) => content.append_text(&fragment),
        _ => false,
    };

    if !appended {
        state.messages.push(Message::assistant_text(fragment));
    }

    vec![]
}

fn handle_tool_call(state: &mut SessionState, id: ToolCallId, name: ToolName) -> Vec<Effect> {
    // Covers duplicate delivery and the pending-confirmation-first race.
    if state.contains_tool_call(&id) {
        return vec![];
    }

    state.pending = Some(Pending::Tool);
    state.mark_expanded(id.clone());
    state
        .messages
        .push(Message::assistant_tool_call(ToolCall::invoked(id, name)));

    vec![]
}

fn handle_tool_call_arguments(state: &mut SessionState, id: &ToolCallId, text: &str) -> Vec<Effect> {
    state.pending = Some(Pending::Tool);

    // Frozen while awaiting confirmation: the authoritative argument
    // string arrived with the pending_confirmation event.
    if state.is_awaiting_confirmation(id) {
        return vec![];
    }

    if let Some(tool_call) = state.tool_calls_mut(id).next() {
        tool_call.function.arguments.push_str(text);
    }

    vec![]
}

fn handle_tool_call_pending_confirmation(
    state: &mut SessionState,
    id: ToolCallId,
    name: ToolName,
    arguments: String,
) -> Vec<Effect> {
    state.pending = Some(Pending::Tool);

    // Entity creation dedups by id, but the gate state updates either
    // way: the entry may already exist from a tool_call event that won
    // the race.
    if !state.contains_tool_call(&id) {
        state
            .messages
            .push(Message::assistant_tool_call(ToolCall::with_arguments(
                id.clone(),
                name,
                arguments,
            )));
    }

    state.pending_confirmations.insert(id.clone());
    state.mark_expanded(id);

    vec![]
}

fn handle_tool_call_confirmed(state: &mut SessionState, id: ToolCallId) -> Vec<Effect> {
    state.pending_confirmations.remove(&id);
    state.mark_expanded(id);
    vec![]
}

fn handle_tool_call_cancelled(state: &mut SessionState, id: &ToolCallId) -> Vec<Effect> {
    state.pending_confirmations.remove(id);

    for tool_call in state.tool_calls_mut(id) {
        tool_call.result = Some(TOOL_CALL_CANCELLED_RESULT.to_string());
    }

    vec![]
}

/// Set the result on every entry matching the id. Snapshot replacement
/// can leave more than one message referencing the same call, so all of
/// them are updated.
fn handle_tool_call_result(
    state: &mut SessionState,
    id: &ToolCallId,
    payload: &ToolResultPayload,
) -> Vec<Effect> {
    if payload.content.is_empty() {
        return vec![];
    }

    for tool_call in state.tool_calls_mut(id) {
        tool_call.result = Some(payload.content.clone());
    }

    vec![]
}

fn handle_media_generated(state: &mut SessionState, reference: String) -> Vec<Effect> {
    state.pending = None;
    state.messages.push(Message::Assistant {
        content: Some(MessageContent::Text(reference)),
        tool_calls: None,
    });
    vec![]
}

/// Wholesale snapshot replacement, then the tool-result merge pass. The
/// merged set is replaced rather than extended so repeat snapshots stay
/// idempotent. Confirmation-pending ids are not re-derived from the
/// snapshot.
fn handle_all_messages(state: &mut SessionState, mut messages: Vec<Message>) -> Vec<Effect> {
    state.merged_tool_results = merge_tool_results(&mut messages);
    state.messages = messages;
    state.progress = None;
    vec![]
}

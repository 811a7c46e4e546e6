use std::collections::HashSet;

use strum_macros::Display;

use crate::session::message::{Message, ToolCall};
use crate::session::types::{SessionId, ToolCallId};

/// Coarse "agent is producing output" signal, used only by loading UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Pending {
    Text,
    Image,
    Tool,
}

/// Latest progress line reported for a running tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallProgress {
    pub tool_call_id: ToolCallId,
    pub update: String,
}

/// All state one session's reducer owns.
///
/// The message sequence is mutated exclusively by [`crate::session::reduce`];
/// everything else observes it read-only. The expanded set is purely
/// presentational and independent of the confirmation-pending set, which
/// gates argument accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
    pub pending: Option<Pending>,
    /// Tool calls whose detail view is open. Presentation only.
    pub expanded_tool_calls: HashSet<ToolCallId>,
    /// Tool calls awaiting a human decision. While an id is in here its
    /// argument string is frozen.
    pub pending_confirmations: HashSet<ToolCallId>,
    /// Tool-result messages folded into their tool call by the snapshot
    /// merge pass; rendering suppresses these to avoid double display.
    pub merged_tool_results: HashSet<ToolCallId>,
    pub progress: Option<ToolCallProgress>,
}

impl SessionState {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
            pending: None,
            expanded_tool_calls: HashSet::new(),
            pending_confirmations: HashSet::new(),
            merged_tool_results: HashSet::new(),
            progress: None,
        }
    }

    pub fn contains_tool_call(&self, id: &ToolCallId) -> bool {
        self.messages.iter().any(|m| m.contains_tool_call(id))
    }

    pub fn find_tool_call(&self, id: &ToolCallId) -> Option<&ToolCall> {
        self.messages
            .iter()
            .flat_map(|m| m.tool_calls().iter())
            .find(|tc| &tc.id == id)
    }

    /// Every entry matching `id` across the sequence. Dedup keeps this to
    /// at most one in incrementally-built state, but snapshot-replaced
    /// transcripts are treated defensively.
    pub fn tool_calls_mut<'a>(
        &'a mut self,
        id: &'a ToolCallId,
    ) -> impl Iterator<Item = &'a mut ToolCall> {
        self.messages
            .iter_mut()
            .flat_map(|m| m.tool_calls_mut().iter_mut())
            .filter(move |tc| &tc.id == id)
    }

    pub fn is_awaiting_confirmation(&self, id: &ToolCallId) -> bool {
        self.pending_confirmations.contains(id)
    }

    pub fn mark_expanded(&mut self, id: ToolCallId) {
        self.expanded_tool_calls.insert(id);
    }

    /// UI toggle for the tool-call detail view.
    pub fn toggle_expanded(&mut self, id: &ToolCallId) {
        if !self.expanded_tool_calls.remove(id) {
            self.expanded_tool_calls.insert(id.clone());
        }
    }
}

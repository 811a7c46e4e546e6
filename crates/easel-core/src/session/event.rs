//! Wire events for one conversational session.
//!
//! One transport connection multiplexes every open session; each event
//! optionally names the session it belongs to. The union is tagged at
//! the transport boundary so malformed payloads fail decode there and
//! never reach the reducer.

use serde::{Deserialize, Serialize};

use crate::session::message::{Message, ToolName};
use crate::session::types::{CanvasId, SessionId, ToolCallId};

/// Payload of a `tool_call_result` event: the tool-result message the
/// backend will also persist into the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<ToolCallId>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Incremental fragment of streamed assistant text.
    Delta {
        #[serde(default)]
        session_id: Option<SessionId>,
        text: String,
    },

    /// A tool call was invoked; arguments stream separately.
    ToolCall {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
        name: ToolName,
    },

    /// Fragment of a tool call's argument string.
    ToolCallArguments {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
        text: String,
    },

    /// A sensitive tool call that needs human approval before it runs.
    /// Carries the full argument string up front.
    ToolCallPendingConfirmation {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
        name: ToolName,
        arguments: String,
    },

    ToolCallConfirmed {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
    },

    ToolCallCancelled {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
    },

    ToolCallResult {
        #[serde(default)]
        session_id: Option<SessionId>,
        id: ToolCallId,
        message: ToolResultPayload,
    },

    /// Transient progress line for a running tool call; loading UI only.
    ToolCallProgress {
        #[serde(default)]
        session_id: Option<SessionId>,
        tool_call_id: ToolCallId,
        update: String,
    },

    ImageGenerated {
        #[serde(default)]
        session_id: Option<SessionId>,
        #[serde(default)]
        canvas_id: Option<CanvasId>,
        image_url: String,
    },

    VideoGenerated {
        #[serde(default)]
        session_id: Option<SessionId>,
        #[serde(default)]
        canvas_id: Option<CanvasId>,
        video_url: String,
    },

    /// Authoritative snapshot replacing the whole transcript.
    AllMessages {
        #[serde(default)]
        session_id: Option<SessionId>,
        messages: Vec<Message>,
    },

    Done {
        #[serde(default)]
        session_id: Option<SessionId>,
    },

    Error {
        #[serde(default)]
        session_id: Option<SessionId>,
        error: String,
    },

    Info {
        #[serde(default)]
        session_id: Option<SessionId>,
        info: String,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            SessionEvent::Delta { session_id, .. }
            | SessionEvent::ToolCall { session_id, .. }
            | SessionEvent::ToolCallArguments { session_id, .. }
            | SessionEvent::ToolCallPendingConfirmation { session_id, .. }
            | SessionEvent::ToolCallConfirmed { session_id, .. }
            | SessionEvent::ToolCallCancelled { session_id, .. }
            | SessionEvent::ToolCallResult { session_id, .. }
            | SessionEvent::ToolCallProgress { session_id, .. }
            | SessionEvent::ImageGenerated { session_id, .. }
            | SessionEvent::VideoGenerated { session_id, .. }
            | SessionEvent::AllMessages { session_id, .. }
            | SessionEvent::Done { session_id }
            | SessionEvent::Error { session_id, .. }
            | SessionEvent::Info { session_id, .. } => session_id.as_ref(),
        }
    }

    pub fn canvas_id(&self) -> Option<&CanvasId> {
        match self {
            SessionEvent::ImageGenerated { canvas_id, .. }
            | SessionEvent::VideoGenerated { canvas_id, .. } => canvas_id.as_ref(),
            _ => None,
        }
    }

    pub fn tool_call_id(&self) -> Option<&ToolCallId> {
        match self {
            SessionEvent::ToolCall { id, .. }
            | SessionEvent::ToolCallArguments { id, .. }
            | SessionEvent::ToolCallPendingConfirmation { id, .. }
            | SessionEvent::ToolCallConfirmed { id, .. }
            | SessionEvent::ToolCallCancelled { id, .. }
            | SessionEvent::ToolCallResult { id, .. } => Some(id),
            SessionEvent::ToolCallProgress { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SessionEvent::Error { .. })
    }
}

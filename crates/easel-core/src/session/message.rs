//! Transcript message types.
//!
//! These mirror the OpenAI-style wire shape the agent backend speaks:
//! role-tagged messages, tool calls with string-accumulated arguments,
//! and tool-result messages that back-reference a tool call by id.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::session::types::ToolCallId;

/// Result string stored on a tool call when its confirmation is declined.
pub const TOOL_CALL_CANCELLED_RESULT: &str = "Tool call cancelled";

/// Tool names carrying this prefix are agent-to-agent handoffs and are
/// suppressed from presentation. The reducer records them like any other.
pub const TRANSFER_TOOL_PREFIX: &str = "transfer_to";

/// Role in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Closed set of tool names the agent may invoke. Unknown names decode
/// into [`ToolName::Other`] so event decoding stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolName {
    GenerateImage,
    GenerateVideo,
    PromptUserMultiChoice,
    PromptUserSingleChoice,
    WritePlan,
    Finish,
    Other(String),
}

impl ToolName {
    pub fn as_str(&self) -> &str {
        match self {
            ToolName::GenerateImage => "generate_image",
            ToolName::GenerateVideo => "generate_video",
            ToolName::PromptUserMultiChoice => "prompt_user_multi_choice",
            ToolName::PromptUserSingleChoice => "prompt_user_single_choice",
            ToolName::WritePlan => "write_plan",
            ToolName::Finish => "finish",
            ToolName::Other(name) => name,
        }
    }

    /// Agent-to-agent transfer calls never render.
    pub fn is_presentation_suppressed(&self) -> bool {
        self.as_str().starts_with(TRANSFER_TOOL_PREFIX)
    }

    /// Names rendered by dedicated widgets instead of the generic
    /// tool-call tag. State handling is identical either way.
    pub fn bypasses_generic_rendering(&self) -> bool {
        matches!(
            self,
            ToolName::PromptUserMultiChoice | ToolName::PromptUserSingleChoice | ToolName::WritePlan
        )
    }
}

impl From<String> for ToolName {
    fn from(value: String) -> Self {
        match value.as_str() {
            "generate_image" => ToolName::GenerateImage,
            "generate_video" => ToolName::GenerateVideo,
            "prompt_user_multi_choice" => ToolName::PromptUserMultiChoice,
            "prompt_user_single_choice" => ToolName::PromptUserSingleChoice,
            "write_plan" => ToolName::WritePlan,
            "finish" => ToolName::Finish,
            _ => ToolName::Other(value),
        }
    }
}

impl From<ToolName> for String {
    fn from(value: ToolName) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallKind {
    #[default]
    Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: ToolName,
    pub arguments: String,
}

/// One tool invocation. Created once per id, then mutated in place:
/// `function.arguments` grows by concatenation while streaming and
/// `result` is filled in when the call resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: ToolCallId,
    #[serde(rename = "type", default)]
    pub kind: ToolCallKind,
    pub function: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ToolCall {
    /// Entry created by a `tool_call` event: arguments stream in later.
    pub fn invoked(id: ToolCallId, name: ToolName) -> Self {
        Self::with_arguments(id, name, String::new())
    }

    /// Entry created by a `tool_call_pending_confirmation` event: the
    /// full argument string arrives atomically.
    pub fn with_arguments(id: ToolCallId, name: ToolName, arguments: String) -> Self {
        Self {
            id,
            kind: ToolCallKind::Function,
            function: FunctionCall { name, arguments },
            result: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.result.as_deref() == Some(TOOL_CALL_CANCELLED_RESULT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Message content is either a plain string or an ordered part list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Append a streamed text fragment to the trailing text segment.
    /// Returns false when there is no trailing text segment to extend.
    pub fn append_text(&mut self, fragment: &str) -> bool {
        match self {
            MessageContent::Text(text) => {
                text.push_str(fragment);
                true
            }
            MessageContent::Parts(parts) => match parts.last_mut() {
                Some(ContentPart::Text { text }) => {
                    text.push_str(fragment);
                    true
                }
                _ => false,
            },
        }
    }
}

/// A transcript message, tagged by role on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User {
        content: MessageContent,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<MessageContent>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },
    Tool {
        tool_call_id: ToolCallId,
        content: String,
    },
}

impl Message {
    pub fn role(&self) -> Role {
        match self {
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(MessageContent::Text(text.into())),
            tool_calls: None,
        }
    }

    /// Assistant message holding exactly one tool call, as the stream
    /// produces them.
    pub fn assistant_tool_call(tool_call: ToolCall) -> Self {
        Message::Assistant {
            content: Some(MessageContent::Text(String::new())),
            tool_calls: Some(vec![tool_call]),
        }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Assistant {
                tool_calls: Some(tool_calls),
                ..
            } => tool_calls,
            _ => &[],
        }
    }

    pub fn tool_calls_mut(&mut self) -> &mut [ToolCall] {
        match self {
            Message::Assistant {
                tool_calls: Some(tool_calls),
                ..
            } => tool_calls,
            _ => &mut [],
        }
    }

    pub fn contains_tool_call(&self, id: &ToolCallId) -> bool {
        self.tool_calls().iter().any(|tc| &tc.id == id)
    }
}

//! Session state: event decoding, the message-assembly reducer, the
//! confirmation gate and the per-session runtime loop.

pub mod arguments;
pub mod event;
pub mod filter;
pub mod merge;
pub mod message;
pub mod reduce;
pub mod runtime;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use arguments::parse_partial_arguments;
pub use event::{SessionEvent, ToolResultPayload};
pub use filter::SessionFilter;
pub use merge::merge_tool_results;
pub use message::{
    ContentPart, FunctionCall, ImageUrl, Message, MessageContent, Role, ToolCall, ToolCallKind,
    ToolName, TOOL_CALL_CANCELLED_RESULT, TRANSFER_TOOL_PREFIX,
};
pub use reduce::{reduce, Effect, NoticeLevel};
pub use runtime::{Notice, SessionCommand, SessionHandle, SessionRuntime};
pub use state::{Pending, SessionState, ToolCallProgress};
pub use types::{CanvasId, SessionId, SessionInfo, ToolCallId};

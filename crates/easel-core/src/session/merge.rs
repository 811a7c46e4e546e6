use std::collections::HashSet;

use crate::session::message::Message;
use crate::session::types::ToolCallId;

/// Snapshot post-processing: fold tool-result messages into the tool
/// calls they answer.
///
/// For every assistant message with tool calls, scan forward for a tool
/// message whose back-reference matches and copy its content into the
/// tool call's `result`. The returned set names the merged tool-call ids
/// so rendering can suppress the standalone tool messages. A later
/// result for the same id wins, and repeat runs yield the same set.
pub fn merge_tool_results(messages: &mut [Message]) -> HashSet<ToolCallId> {
    let mut merged = HashSet::new();

    for index in 0..messages.len() {
        let ids: Vec<ToolCallId> = messages[index]
            .tool_calls()
            .iter()
            .map(|tc| tc.id.clone())
            .collect();

        for id in ids {
            let mut result = None;
            for later in &messages[index + 1..] {
                if let Message::Tool {
                    tool_call_id,
                    content,
                } = later
                    && *tool_call_id == id
                {
                    result = Some(content.clone());
                }
            }

            if let Some(content) = result {
                for tool_call in messages[index].tool_calls_mut() {
                    if tool_call.id == id {
                        tool_call.result = Some(content.clone());
                    }
                }
                merged.insert(id);
            }
        }
    }

    merged
}

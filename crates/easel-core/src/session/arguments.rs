//! Best-effort parsing of streamed tool-call arguments.
//!
//! The argument string accumulates by concatenation, so until streaming
//! completes it is usually invalid JSON. Consumers that need structured
//! access parse what they can; rendering falls back to the raw string
//! when nothing can be salvaged. Nothing here errors the reducer.

use serde_json::Value;

/// Parse an argument string that may be incomplete. Tries a straight
/// parse first, then salvages by truncating to the last closing brace.
pub fn parse_partial_arguments(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }
    salvage(raw)
}

fn salvage(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    let end = trimmed.rfind('}')?;
    if end == 0 {
        return None;
    }
    serde_json::from_str(&trimmed[..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(r#"{"prompt":"cat"}"#, Some(json!({"prompt": "cat"})))]
    // Trailing stream garbage after the object is dropped.
    #[case("{\"prompt\":\"cat\"}\nextra tokens", Some(json!({"prompt": "cat"})))]
    #[case(r#"{"prompt":"cat"} {"#, Some(json!({"prompt": "cat"})))]
    // Mid-stream prefix with no closing brace yet.
    #[case(r#"{"prompt":"ca"#, None)]
    #[case("", None)]
    #[case("not json at all", None)]
    fn parses_or_salvages(#[case] raw: &str, #[case] expected: Option<Value>) {
        assert_eq!(parse_partial_arguments(raw), expected);
    }

    #[test]
    fn never_panics_on_arbitrary_fragments() {
        for raw in ["}", "}}", "{}}", "\u{0}}", "{\"a\":1}{\"b\":2}"] {
            let _ = parse_partial_arguments(raw);
        }
    }
}

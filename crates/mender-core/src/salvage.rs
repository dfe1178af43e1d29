//! Single-shot repair of argument strings that failed strict parsing.
//!
//! Models often wrap JSON in a markdown fence:
//!
//! ````text
//! ```json
//! {"city": "Oslo"}
//! ```
//! ````
//!
//! [`salvage`] trims whitespace, removes one opening ```` ```json ```` marker
//! and one closing ```` ``` ```` marker, trims again and parses once. There is
//! no second attempt.

use tracing::debug;

use crate::value::{parse_arguments, Arguments};

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "```";

/// Strip fence markers and surrounding whitespace from `raw`.
#[must_use]
pub fn strip_fences(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.strip_prefix(OPEN_FENCE).unwrap_or(s);
    let s = s.strip_suffix(CLOSE_FENCE).unwrap_or(s);
    s.trim()
}

/// Try once to recover a JSON object from `raw`.
pub fn salvage(raw: &str) -> serde_json::Result<Arguments> {
    let stripped = strip_fences(raw);
    debug!(
        original_len = raw.len(),
        stripped_len = stripped.len(),
        "Attempting argument salvage"
    );
    parse_arguments(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn fenced_object_is_recovered() {
        let args = salvage("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args["a"], Value::Int(1));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let args = salvage("  \n ```json {\"k\": \"v\"} ```  \t").unwrap();
        assert_eq!(args["k"], Value::from("v"));
    }

    #[test]
    fn unfenced_input_is_parsed_as_is() {
        assert!(salvage(r#"{"k": true}"#).is_ok());
    }

    #[test]
    fn only_closing_fence_is_stripped() {
        assert!(salvage("{\"k\": 1}\n```").is_ok());
    }

    #[test]
    fn broken_json_is_not_repaired() {
        assert!(salvage("{not json").is_err());
        assert!(salvage("{operation: multiply}").is_err());
        assert!(salvage("```json\n{\"a\":1,}\n```").is_err());
    }

    #[test]
    fn bare_fence_with_other_language_tag_is_not_recovered() {
        // Only the `json` tag is recognised; "```js" leaves "js" behind.
        assert!(salvage("```js\n{\"a\":1}\n```").is_err());
    }

    #[test]
    fn strip_fences_leaves_inner_text() {
        assert_eq!(strip_fences(" ```json\n[1]\n``` "), "[1]");
        assert_eq!(strip_fences("plain"), "plain");
    }
}

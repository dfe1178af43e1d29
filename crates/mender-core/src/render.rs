//! Text rendering of a [`BatchResult`].
//!
//! The rendered text is the entire response, so it doubles as a wire format:
//!
//! ```text
//! Processed tool calls:
//! [
//!   { ... }
//! ]
//!
//! Errors during processing:
//! - tool call [1] failed: ...
//! ```
//!
//! The error section is only present when at least one call failed.
//! [`parse_rendered`] reverses the rendering for downstream consumers.

use std::fmt::Write as _;

use crate::call::{BatchResult, ToolCall};

/// First line of every rendered response.
pub const CALLS_HEADER: &str = "Processed tool calls:";
/// Header introducing the error section.
pub const ERRORS_HEADER: &str = "Errors during processing:";

/// Render `result` as header, pretty JSON array and optional error list.
#[must_use]
pub fn render(result: &BatchResult) -> String {
    let calls_json =
        serde_json::to_string_pretty(&result.calls).unwrap_or_else(|_| "[]".to_string());

    let mut out = format!("{CALLS_HEADER}\n{calls_json}");

    if !result.errors.is_empty() {
        let _ = write!(out, "\n\n{ERRORS_HEADER}\n");
        for error in &result.errors {
            let _ = writeln!(out, "- {error}");
        }
    }

    out
}

/// Recover the calls and error messages from text produced by [`render`].
///
/// Pretty-printed JSON never contains a blank line, so the first blank line
/// after the array marks the error section.
pub fn parse_rendered(text: &str) -> serde_json::Result<BatchResult> {
    let body = text
        .strip_prefix(CALLS_HEADER)
        .map_or(text, |rest| rest.trim_start_matches('\n'));

    let (calls_json, errors_section) = match body.split_once("\n\n") {
        Some((calls, rest)) => (calls, Some(rest)),
        None => (body, None),
    };

    let calls: Vec<ToolCall> = serde_json::from_str(calls_json)?;
    let errors = errors_section
        .map(|section| {
            section
                .lines()
                .filter_map(|line| line.strip_prefix("- "))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(BatchResult { calls, errors })
}

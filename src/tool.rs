//! The `enhancetool` MCP tool: descriptor and call handler.

use mender_core::Mender;
use serde_json::{Value, json};
use tracing::warn;

use crate::protocol::{Content, Tool, ToolAnnotations, ToolsCallResult};
use crate::{Error, Result};

/// Name the repair tool is advertised under
pub const TOOL_NAME: &str = "enhancetool";

/// Describe the repair tool for `tools/list`.
#[must_use]
pub fn descriptor() -> Tool {
    Tool {
        name: TOOL_NAME.to_string(),
        description: Some(
            "Adds a fault-tolerance layer over LLM tool-call arguments: validates and \
             repairs argument format, types and missing values"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "tool_calls": {
                    "type": "array",
                    "description": "Tool calls to process",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": { "type": "string" },
                            "id": { "type": "string" },
                            "function": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "arguments": {
                                        "type": "string",
                                        "description": "Raw JSON-encoded arguments"
                                    }
                                },
                                "required": ["name"]
                            }
                        }
                    }
                },
                "strict_mode": {
                    "type": "boolean",
                    "description": "Drop calls that fail processing instead of passing them through (default false)"
                }
            },
            "required": ["tool_calls"]
        }),
        annotations: Some(ToolAnnotations {
            title: Some("Tool-call repair".to_string()),
            read_only_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }),
    }
}

/// Normalize `tools/call` arguments into a request object.
///
/// Accepts an object or a JSON-encoded object string (OpenAI style).
pub fn parse_tool_arguments(arguments: &Value) -> Result<Value> {
    let arguments = match arguments {
        Value::String(raw) => serde_json::from_str(raw).map_err(|e| {
            Error::Mender(mender_core::Error::MalformedRequest(format!(
                "invalid 'arguments' JSON string: {e}"
            )))
        })?,
        Value::Null => json!({}),
        other => other.clone(),
    };

    if !arguments.is_object() {
        return Err(Error::Mender(mender_core::Error::MalformedRequest(
            "expected object or JSON object string".to_string(),
        )));
    }

    Ok(arguments)
}

/// Run the repair pipeline for one `tools/call` invocation.
///
/// Request-level failures are reported in-band with `isError: true` so the
/// calling model sees the reason.
#[must_use]
pub fn call_tool(mender: &Mender, arguments: &Value) -> ToolsCallResult {
    let outcome = parse_tool_arguments(arguments)
        .and_then(|request| mender.handle_value(request).map_err(Error::from));

    match outcome {
        Ok(text) => ToolsCallResult {
            content: vec![Content::text(text)],
            is_error: false,
        },
        Err(e) => {
            warn!(error = %e, "Rejected enhancetool request");
            ToolsCallResult {
                content: vec![Content::text(format!("{TOOL_NAME} request rejected: {e}"))],
                is_error: true,
            }
        }
    }
}

//! Tool-call wire types

use serde::{Deserialize, Serialize};

use crate::value::Arguments;

/// One tool call as emitted by a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call type (normally `"function"`)
    #[serde(rename = "type", default)]
    pub call_type: String,
    /// Function name and raw argument string
    #[serde(default)]
    pub function: FunctionCall,
    /// Provider-assigned call id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Decoded arguments; only set once the call has been repaired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Arguments>,
}

impl ToolCall {
    /// Function-type call with the given name and raw arguments.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
            id: None,
            parameters: None,
        }
    }

    /// Attach a call id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Function part of a [`ToolCall`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name used for validator dispatch
    #[serde(default)]
    pub name: String,
    /// Raw, possibly malformed, JSON argument string
    #[serde(default)]
    pub arguments: String,
}

/// A batch of tool calls to repair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Calls to process, in order
    pub tool_calls: Vec<ToolCall>,
    /// Drop failing calls instead of passing them through.
    /// `None` defers to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_mode: Option<bool>,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Repaired or passed-through calls, in input order
    pub calls: Vec<ToolCall>,
    /// Index-tagged error messages, in input order
    pub errors: Vec<String>,
}

impl BatchResult {
    /// `true` if no call failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

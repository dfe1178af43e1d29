//! Error types for the repair pipeline

use thiserror::Error;

use crate::validate::ValidationError;

/// Result type alias for the repair pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors.
///
/// `MalformedRequest` and `EmptyBatch` reject a whole request. Every other
/// variant is scoped to one tool call and is recovered by the batch driver.
#[derive(Error, Debug)]
pub enum Error {
    /// Request value does not have the batch-request shape
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Request carried no tool calls
    #[error("tool_calls must not be empty")]
    EmptyBatch,

    /// Arguments are not a JSON object and strict mode forbids salvage
    #[error("arguments are not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Arguments are not a JSON object even after salvage
    #[error("arguments are not valid JSON and could not be repaired: {0}")]
    UnrecoverableJson(#[source] serde_json::Error),

    /// Arguments were rejected by the tool's validator
    #[error("argument validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Repaired arguments could not be re-encoded
    #[error("failed to re-encode arguments: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// `true` for errors that reject the whole request rather than one call.
    #[must_use]
    pub fn is_request_level(&self) -> bool {
        matches!(self, Self::MalformedRequest(_) | Self::EmptyBatch)
    }
}

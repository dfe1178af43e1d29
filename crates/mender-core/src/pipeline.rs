//! Request-level entry point.

use tracing::debug;

use crate::call::{BatchRequest, BatchResult};
use crate::process::process_batch;
use crate::render::render;
use crate::validate::ValidatorRegistry;
use crate::{Error, Result};

/// Repair pipeline bound to a validator registry.
///
/// Immutable once built; share it behind an `Arc` to serve concurrent
/// requests.
#[derive(Debug, Default)]
pub struct Mender {
    registry: ValidatorRegistry,
    default_strict: bool,
}

impl Mender {
    /// Pipeline using `registry`, lenient unless a request asks otherwise.
    #[must_use]
    pub fn new(registry: ValidatorRegistry) -> Self {
        Self {
            registry,
            default_strict: false,
        }
    }

    /// Policy applied when a request omits `strict_mode`.
    #[must_use]
    pub fn with_default_strict(mut self, strict: bool) -> Self {
        self.default_strict = strict;
        self
    }

    /// Validators in use.
    #[must_use]
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Policy applied when a request omits `strict_mode`.
    #[must_use]
    pub fn default_strict(&self) -> bool {
        self.default_strict
    }

    /// Process a decoded request without rendering it.
    pub fn process(&self, request: BatchRequest) -> Result<BatchResult> {
        if request.tool_calls.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let strict = request.strict_mode.unwrap_or(self.default_strict);
        Ok(process_batch(request.tool_calls, strict, &self.registry))
    }

    /// Process a decoded request and render the response text.
    pub fn handle(&self, request: BatchRequest) -> Result<String> {
        self.process(request).map(|result| render(&result))
    }

    /// Decode `value` as a [`BatchRequest`] and handle it.
    pub fn handle_value(&self, value: serde_json::Value) -> Result<String> {
        let request = serde_json::from_value(value).map_err(malformed)?;
        self.handle(request)
    }
}

/// Decode raw JSON text as a [`BatchRequest`].
pub fn decode_request(raw: &str) -> Result<BatchRequest> {
    serde_json::from_str(raw).map_err(malformed)
}

fn malformed(e: serde_json::Error) -> Error {
    debug!(error = %e, "Rejecting malformed batch request");
    Error::MalformedRequest(e.to_string())
}

//! Per-call repair and the batch driver.
//!
//! ```text
//! arguments ──▶ parse ──(fail, lenient)──▶ salvage
//!                 │                           │
//!                 ▼                           ▼
//!              coerce ◀───────────────────────┘
//!                 │
//!                 ▼
//!              validate ──(fail, lenient)──▶ keep coerced
//!                 │                               │
//!                 ▼                               ▼
//!              re-encode ◀────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use crate::call::{BatchResult, ToolCall};
use crate::coerce::coerce_arguments;
use crate::salvage::salvage;
use crate::validate::ValidatorRegistry;
use crate::value::{encode_arguments, parse_arguments};
use crate::{Error, Result};

/// Repair a single tool call.
///
/// Calls with an empty argument string are returned unchanged. On error the
/// input call is left untouched; the caller decides what to emit.
pub fn process_call(
    call: &ToolCall,
    strict: bool,
    registry: &ValidatorRegistry,
) -> Result<ToolCall> {
    let raw = &call.function.arguments;
    if raw.is_empty() {
        return Ok(call.clone());
    }

    let args = match parse_arguments(raw) {
        Ok(args) => args,
        Err(e) if strict => return Err(Error::MalformedJson(e)),
        Err(e) => {
            debug!(tool = %call.function.name, error = %e, "Arguments failed to parse, salvaging");
            salvage(raw).map_err(Error::UnrecoverableJson)?
        }
    };

    let fixed = coerce_arguments(args);

    let final_args = match registry.validate(&call.function.name, &fixed) {
        Ok(validated) => validated,
        Err(e) if strict => return Err(e.into()),
        Err(e) => {
            debug!(
                tool = %call.function.name,
                param = e.param(),
                error = %e,
                "Validation failed in lenient mode, keeping coerced arguments"
            );
            fixed
        }
    };

    let encoded = encode_arguments(&final_args).map_err(Error::Encode)?;

    let mut repaired = call.clone();
    repaired.function.arguments = encoded;
    repaired.parameters = Some(final_args);
    Ok(repaired)
}

/// Run [`process_call`] over `calls` in order.
///
/// A failing call is recorded in [`BatchResult::errors`] with its index. In
/// strict mode it is then dropped; otherwise the original call is emitted.
pub fn process_batch(
    calls: Vec<ToolCall>,
    strict: bool,
    registry: &ValidatorRegistry,
) -> BatchResult {
    let total = calls.len();
    let mut result = BatchResult {
        calls: Vec::with_capacity(total),
        errors: Vec::new(),
    };

    for (index, call) in calls.into_iter().enumerate() {
        match process_call(&call, strict, registry) {
            Ok(repaired) => result.calls.push(repaired),
            Err(e) => {
                warn!(index, tool = %call.function.name, strict, error = %e, "Tool call failed");
                result.errors.push(format!("tool call [{index}] failed: {e}"));
                if !strict {
                    result.calls.push(call);
                }
            }
        }
    }

    info!(
        total,
        emitted = result.calls.len(),
        failed = result.errors.len(),
        strict,
        "Processed tool-call batch"
    );

    result
}

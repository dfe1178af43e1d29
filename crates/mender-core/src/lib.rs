//! Tool-call repair core
//!
//! Sits between a model's tool-call output and the tool executor. Each call
//! in a batch has its argument string parsed (or salvaged from markdown
//! fencing), its top-level values coerced to their likely intended types,
//! and the result checked by a per-tool validator before being re-encoded.
//!
//! # Policies
//!
//! - **Lenient** (default): a failing call is reported and emitted unchanged.
//! - **Strict**: a failing call is reported and dropped; no salvage is tried.
//!
//! Either way one bad call never aborts the batch.
//!
//! ```rust
//! use mender_core::{BatchRequest, Mender, ToolCall};
//!
//! let mender = Mender::default();
//! let text = mender
//!     .handle(BatchRequest {
//!         tool_calls: vec![ToolCall::new(
//!             "calculator",
//!             r#"{"operation": "multiply", "x": "5", "y": "3"}"#,
//!         )],
//!         strict_mode: None,
//!     })
//!     .unwrap();
//! assert!(text.contains(r#"{\"operation\":\"multiply\",\"x\":5,\"y\":3}"#));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod call;
pub mod coerce;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod salvage;
pub mod validate;
pub mod value;

pub use call::{BatchRequest, BatchResult, FunctionCall, ToolCall};
pub use error::{Error, Result};
pub use pipeline::{decode_request, Mender};
pub use validate::{ArgumentValidator, ParamType, ValidationError, ValidationRule, ValidatorRegistry};
pub use value::{Arguments, Value};

//! tool-mender
//!
//! Repairs LLM tool-call arguments before they reach a tool executor and
//! exposes the repair pipeline as the `enhancetool` MCP tool.
//!
//! # Features
//!
//! - **Salvage**: strips markdown fences from malformed argument strings
//! - **Coercion**: `"5"` → `5`, `"TRUE"` → `true`, `4.0` → `4`
//! - **Validation**: per-tool rules (built-in and YAML-configured)
//! - **Policies**: lenient pass-through or strict drop, per request
//!
//! The pipeline itself lives in [`mender_core`]; this crate adds
//! configuration, logging, the CLI and the stdio MCP server.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tool;

pub use error::{Error, Result};
pub use mender_core;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging on stderr
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

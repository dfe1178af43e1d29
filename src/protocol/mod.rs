//! MCP protocol types (the subset a single-tool stdio server needs)

mod messages;
mod types;

pub use messages::*;
pub use types::*;

/// Newest MCP protocol version this server speaks
pub const PROTOCOL_VERSION: &str = "2025-11-25";

/// Protocol versions accepted during `initialize`, newest first
pub const SUPPORTED_VERSIONS: &[&str] = &["2025-11-25", "2025-06-18", "2025-03-26", "2024-11-05"];

/// Pick the protocol version to answer `initialize` with.
///
/// Echoes the client's version when supported, otherwise offers the newest.
#[must_use]
pub fn negotiate_version(requested: &str) -> &'static str {
    SUPPORTED_VERSIONS
        .iter()
        .find(|v| **v == requested)
        .copied()
        .unwrap_or(PROTOCOL_VERSION)
}

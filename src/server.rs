//! MCP server over newline-delimited JSON-RPC on stdio.
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Logging goes to stderr so stdout carries protocol traffic only.
//!
//! Supported methods: `initialize`, `ping`, `tools/list`, `tools/call`.
//! Notifications are accepted and ignored.

use std::sync::Arc;

use mender_core::Mender;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::rpc_codes;
use crate::protocol::{
    Info, InitializeResult, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId,
    ServerCapabilities, ToolsCallParams, ToolsCapability, ToolsListResult, negotiate_version,
};
use crate::tool::{TOOL_NAME, call_tool, descriptor};
use crate::{Error, Result};

/// Stdio MCP server exposing the repair pipeline as one tool
pub struct McpServer {
    mender: Arc<Mender>,
    config: ServerConfig,
}

impl McpServer {
    /// Create a server around a shared pipeline
    #[must_use]
    pub fn new(mender: Arc<Mender>, config: ServerConfig) -> Self {
        Self { mender, config }
    }

    /// Serve on the process's stdin/stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        info!(server = %self.config.name, "Serving MCP on stdio");
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve messages from `reader`, writing responses to `writer`
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line) {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        debug!("Input closed, stopping server");
        Ok(())
    }

    /// Handle one raw line; `None` for notifications
    ///
    /// A message carrying an `id` member is a request. If that id is not a
    /// string or integer the request is rejected rather than treated as a
    /// notification.
    #[must_use]
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    None,
                    rpc_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        if message.get("id").is_some() {
            return Some(match serde_json::from_value::<JsonRpcRequest>(message) {
                Ok(request) => self.handle_request(request),
                Err(e) => invalid_request(&e),
            });
        }

        match serde_json::from_value::<JsonRpcNotification>(message) {
            Ok(notification) => {
                debug!(method = %notification.method, "Ignoring notification");
                None
            }
            Err(e) => Some(invalid_request(&e)),
        }
    }

    /// Dispatch one request
    #[must_use]
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(id = %request.id, method = %request.method, "Handling request");
        let id = request.id;

        let result = match request.method.as_str() {
            "initialize" => self.initialize(request.params.as_ref()),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(ToolsListResult {
                tools: vec![descriptor()],
            }),
            "tools/call" => self.tools_call(request.params),
            other => Err(Error::json_rpc(
                rpc_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        respond(id, result)
    }

    fn initialize(&self, params: Option<&Value>) -> Result<Value> {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        to_value(InitializeResult {
            protocol_version: negotiate_version(requested).to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: Info {
                name: self.config.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Tool-call repair".to_string()),
            },
            instructions: self.config.instructions.clone(),
        })
    }

    fn tools_call(&self, params: Option<Value>) -> Result<Value> {
        let params: ToolsCallParams = params
            .ok_or_else(|| Error::json_rpc(rpc_codes::INVALID_PARAMS, "Missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| {
                    Error::json_rpc(rpc_codes::INVALID_PARAMS, format!("Invalid params: {e}"))
                })
            })?;

        if params.name != TOOL_NAME {
            return Err(Error::json_rpc(
                rpc_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            ));
        }

        to_value(call_tool(&self.mender, &params.arguments))
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(Error::from)
}

fn invalid_request(e: &serde_json::Error) -> JsonRpcResponse {
    warn!(error = %e, "Invalid JSON-RPC request");
    JsonRpcResponse::error(
        None,
        rpc_codes::INVALID_REQUEST,
        format!("Invalid request: {e}"),
    )
}

fn respond(id: RequestId, result: Result<Value>) -> JsonRpcResponse {
    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            let code = match &e {
                // Serializing our own result failed; not the client's fault.
                Error::Json(_) => rpc_codes::INTERNAL_ERROR,
                other => other.to_rpc_code(),
            };
            let message = match e {
                Error::JsonRpc { message, .. } => message,
                other => other.to_string(),
            };
            JsonRpcResponse::error(Some(id), code, message)
        }
    }
}

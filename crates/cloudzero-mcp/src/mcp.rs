//! MCP server: JSON-RPC 2.0 over newline-delimited stdio.
//!
//! Each request line is handled on its own task so slow CloudZero calls do
//! not block the rest; responses funnel through one writer so output lines
//! never interleave.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::prompts;
use crate::tools::{self, BillingTools};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "CloudZero";

/// JSON-RPC request structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    /// Absent for notifications.
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP server state
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: BillingTools,
}

impl McpServer {
    pub fn new(tools: BillingTools) -> Self {
        Self { tools }
    }

    /// Handle one request. Notifications produce no response.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "Received notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Self::handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, tools::tool_definitions()),
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            "prompts/list" => JsonRpcResponse::success(id, prompts::prompt_definitions()),
            "prompts/get" => Self::handle_prompt_get(id, request.params.as_ref()),
            _ => JsonRpcResponse::failure(id, -32601, "Method not found"),
        };
        Some(response)
    }

    fn handle_initialize(id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    async fn handle_tool_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, -32602, "Missing params");
        };

        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match self.tools.call(tool_name, arguments).await {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": text
                        }]
                    }),
                )
            }
            Err(e) => {
                warn!(tool = tool_name, error = %e, "Tool call failed");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": format!("Error: {e}")
                        }],
                        "isError": true
                    }),
                )
            }
        }
    }

    fn handle_prompt_get(id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, -32602, "Missing params");
        };

        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match prompts::get_prompt(name, &arguments) {
            Ok(prompt) => JsonRpcResponse::success(id, prompt),
            Err(e) => JsonRpcResponse::failure(id, -32602, e.to_string()),
        }
    }

    /// Handle one raw input line, including parse failures.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                Value::Null,
                -32700,
                format!("Parse error: {e}"),
            )),
        }
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns once every in-flight request has been answered.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !line.trim().is_empty() {
                        Self::dispatch(Arc::clone(&self), line, tx.clone());
                    }
                }
                Some(out) = rx.recv() => {
                    write_line(&mut writer, &out).await?;
                }
            }
        }

        // Input closed: flush whatever the in-flight handlers still produce.
        drop(tx);
        while let Some(out) = rx.recv().await {
            write_line(&mut writer, &out).await?;
        }
        Ok(())
    }

    fn dispatch(server: Arc<Self>, line: String, tx: mpsc::UnboundedSender<String>) {
        tokio::spawn(async move {
            let Some(response) = server.handle_line(&line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(out) => {
                    let _ = tx.send(out);
                }
                Err(e) => warn!(error = %e, "Failed to serialize response"),
            }
        });
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

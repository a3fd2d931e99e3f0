//! MCP server implementation.
//!
//! Handles newline-delimited JSON-RPC 2.0 over stdio. The protocol handling is
//! deliberately permissive: lines that are not JSON objects are dropped without
//! a reply, unknown methods get an empty result, and tool failures are reported
//! inside the result rather than as JSON-RPC errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::io::{BufRead, Write};
use tracing::warn;

use crate::client::RedashClient;
use crate::error::Result;
use crate::tools::ToolRegistry;
use crate::transport::{HttpTransport, Transport};

/// MCP protocol version we support.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server information.
const SERVER_NAME: &str = "redash-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON-RPC 2.0 request. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Correlation id, echoed back; null when absent.
    #[serde(default)]
    pub id: JsonValue,
    /// Method name. Kept as raw JSON so a non-string method still gets a reply.
    #[serde(default)]
    pub method: JsonValue,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: String,
    /// Id of the request being answered.
    pub id: JsonValue,
    /// Method result.
    pub result: JsonValue,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
        }
    }
}

/// MCP server.
pub struct McpServer<T: Transport = HttpTransport> {
    client: RedashClient<T>,
    registry: ToolRegistry,
}

impl<T: Transport> McpServer<T> {
    /// Create a new MCP server around the given client.
    pub fn new(client: RedashClient<T>) -> Self {
        Self {
            client,
            registry: ToolRegistry::new(),
        }
    }

    /// The client tool calls are routed to.
    pub fn client(&self) -> &RedashClient<T> {
        &self.client
    }

    /// Run the server, reading from stdin and writing to stdout.
    pub fn run_sync(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve requests from `reader` until EOF, one response line per request.
    pub fn serve<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<()> {
        let mut line = Vec::new();

        loop {
            line.clear();
            let bytes_read = reader.read_until(b'\n', &mut line)?;

            if bytes_read == 0 {
                // EOF - client disconnected
                break;
            }

            let response = match self.handle_line(&line) {
                Some(response) => response,
                None => continue,
            };

            let response_json = serde_json::to_string(&response)?;
            writeln!(writer, "{}", response_json)?;
            writer.flush()?;
        }

        Ok(())
    }

    /// Handle one raw input line. Returns `None` for lines that get no reply,
    /// including lines that are not valid UTF-8.
    pub fn handle_line(&mut self, line: &[u8]) -> Option<JsonRpcResponse> {
        let line = line.trim_ascii();
        if line.is_empty() {
            return None;
        }

        let value = serde_json::from_slice::<JsonValue>(line).ok()?;
        if !value.is_object() {
            return None;
        }
        let request = serde_json::from_value::<JsonRpcRequest>(value).ok()?;

        Some(self.handle_request(request))
    }

    /// Handle a single JSON-RPC request.
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = match request.method.as_str() {
            Some("initialize") => self.handle_initialize(),
            Some("tools/list") => self.handle_tools_list(),
            Some("tools/call") => self.handle_tools_call(request.params),
            _ => json!({}),
        };

        JsonRpcResponse::success(request.id, result)
    }

    /// Handle the initialize request.
    fn handle_initialize(&self) -> JsonValue {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        })
    }

    /// Handle the tools/list request.
    fn handle_tools_list(&self) -> JsonValue {
        json!({ "tools": self.registry.tools() })
    }

    /// Handle the tools/call request.
    fn handle_tools_call(&mut self, params: Option<JsonValue>) -> JsonValue {
        let params = match params {
            Some(JsonValue::Object(obj)) => obj,
            _ => Map::new(),
        };

        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");

        let arguments = match params.get("arguments") {
            Some(JsonValue::Object(obj)) => obj.clone(),
            _ => Map::new(),
        };

        let result = match self.registry.dispatch(&self.client, name, arguments) {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                json!({ "error": err.to_string() })
            }
        };

        // MCP tool responses are wrapped in content array
        json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string(&result).unwrap_or_else(|e| e.to_string())
            }]
        })
    }
}

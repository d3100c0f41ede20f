//! JSON-RPC method routing.
//!
//! The dispatcher receives a request whose envelope has already been checked
//! and always answers with a response carrying the caller's `id`.

use crate::error::{CallError, McpError, McpResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::registry::ToolRegistry;
use crate::sanitize::sanitize;
use crate::types::{CallToolResult, InitializeResult, ServerInfo};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Routes `initialize`, `tools/list` and `tools/call`
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl Dispatcher {
    /// Create a dispatcher over a registry
    pub fn new(registry: Arc<ToolRegistry>, server_info: ServerInfo) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    /// Registry this dispatcher calls into
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Server identity reported by `initialize`
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Handle one request.
    pub fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let outcome = match request.method.as_str() {
            "initialize" => to_result(&InitializeResult::new(&self.server_info), "initialize"),
            "tools/list" => to_result(
                &json!({ "tools": self.registry.list_tools() }),
                "tools/list",
            ),
            "tools/call" => self.call_tool(&request),
            other => Err(McpError::method_not_found(other)),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => {
                tracing::debug!(
                    method = %request.method,
                    kind = err.kind.description(),
                    "request failed"
                );
                JsonRpcResponse::error(request.id, err)
            }
        }
    }

    fn call_tool(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let name = match request.param("name") {
            Some(Value::String(name)) => name.as_str(),
            Some(other) => return Err(McpError::unknown_tool(&other.to_string())),
            None => return Err(McpError::unknown_tool("null")),
        };
        let arguments = request
            .param("arguments")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let context = format!("Tool execution: {name}");
        let output = self.registry.call_tool(name, arguments).map_err(|err| match &err {
            CallError::UnknownTool(name) => McpError::unknown_tool(name),
            CallError::MissingArgument { .. } => McpError::invalid_parameter(err.to_string()),
            CallError::Execution { .. } => {
                McpError::tool_execution_failed(sanitize(&err, &context).message)
            }
        })?;

        let text = output
            .into_text()
            .map_err(|err| McpError::tool_execution_failed(sanitize(&err, &context).message))?;
        to_result(&CallToolResult::text(text), &context)
    }
}

/// Serialize a result body, sanitizing the (unexpected) failure case.
fn to_result<T: Serialize>(value: &T, context: &str) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|err| McpError::internal(sanitize(&err, context).message))
}

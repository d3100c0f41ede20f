//! JSON-RPC 2.0 envelopes.
//!
//! Requests are read leniently from an already-parsed [`Value`]; responses
//! are written strictly: `jsonrpc` is always `"2.0"`, `id` is always
//! present (possibly `null`), and exactly one of `result` / `error` appears.

use crate::error::McpError;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Marker that always serializes as `"2.0"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

/// Validated inbound request
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Method name, never empty
    pub method: String,
    /// Method parameters as supplied
    pub params: Option<Value>,
    /// Request id as supplied, `null` when absent
    pub id: Value,
}

impl JsonRpcRequest {
    /// Create a request directly
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Value) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Check the envelope shape of a parsed body.
    ///
    /// Fails with `Invalid Request` unless `jsonrpc` is `"2.0"` and `method`
    /// is a non-empty string. Other members are ignored.
    pub fn from_value(body: &Value) -> Result<Self, McpError> {
        let Value::Object(map) = body else {
            return Err(McpError::invalid_request());
        };
        if map.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(McpError::invalid_request());
        }
        let method = match map.get("method").and_then(Value::as_str) {
            Some(method) if !method.is_empty() => method.to_string(),
            _ => return Err(McpError::invalid_request()),
        };
        Ok(Self {
            method,
            params: map.get("params").cloned(),
            id: request_id(body),
        })
    }

    /// `params.<key>`, when params is an object holding that key
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref()?.as_object()?.get(key)
    }
}

/// The `id` of a body, or `null` when the body is not an object or has none.
pub fn request_id(body: &Value) -> Value {
    body.get("id").cloned().unwrap_or(Value::Null)
}

/// Wire error object: `{"code": int, "message": string}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl JsonRpcError {
    /// Create an error object
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Either a result or an error, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    /// Successful result
    Result(Value),
    /// Failure
    Error(JsonRpcError),
}

/// Outbound response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`
    pub jsonrpc: JsonRpcVersion,
    /// Result or error member
    #[serde(flatten)]
    pub payload: ResponsePayload,
    /// Echoed request id
    pub id: Value,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            payload: ResponsePayload::Result(result),
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: impl Into<JsonRpcError>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            payload: ResponsePayload::Error(error.into()),
            id,
        }
    }

    /// Result member, if successful
    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(result) => Some(result),
            ResponsePayload::Error(_) => None,
        }
    }

    /// Error member, if failed
    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(error) => Some(error),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

//! Error taxonomy.
//!
//! Three layers, from the wire inwards:
//!
//! - [`McpError`]: what a client sees: an [`ErrorKind`] plus a message that
//!   is already safe to expose.
//! - [`CallError`]: what [`ToolRegistry::call_tool`](crate::ToolRegistry::call_tool)
//!   returns. Domain errors (`UnknownTool`, `MissingArgument`) carry safe
//!   messages; `Execution` wraps a handler failure and must be sanitized.
//! - [`ToolError`]: what a handler returns.
//!
//! ```rust
//! use stridemcp_core::{ErrorKind, McpError};
//!
//! let err = McpError::unknown_tool("bogus");
//! assert_eq!(err.kind, ErrorKind::InvalidParameter);
//! assert_eq!(err.jsonrpc_error_code(), -32603);
//! assert_eq!(err.message, "Unknown tool: bogus");
//! ```

use crate::guard::{ComplexityError, PayloadError};
use crate::jsonrpc::JsonRpcError;
use serde::{Deserialize, Serialize};

/// Result type alias for protocol-level operations
pub type McpResult<T> = Result<T, McpError>;

/// Error classification for wire responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Body is not valid JSON (-32700)
    ParseError,
    /// Envelope is not a JSON-RPC 2.0 request (-32600)
    InvalidRequest,
    /// Unknown method (-32601)
    MethodNotFound,
    /// Unknown tool or missing tool argument (-32603)
    InvalidParameter,
    /// Failure outside tool execution (-32603)
    Internal,
    /// Tool handler failed (-32603)
    ToolExecutionFailed,
    /// Body above the size limit (-32600)
    PayloadTooLarge,
    /// Body above a structural limit (-32600)
    PayloadTooComplex,
}

impl ErrorKind {
    /// JSON-RPC error code sent on the wire.
    ///
    /// Several kinds share a code; the kind is kept for logging and HTTP
    /// status selection.
    pub const fn jsonrpc_error_code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest | Self::PayloadTooLarge | Self::PayloadTooComplex => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParameter | Self::Internal | Self::ToolExecutionFailed => -32603,
        }
    }

    /// HTTP status used when this error is produced at the HTTP boundary.
    ///
    /// Errors produced by the dispatcher travel inside a 200 response.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::ParseError | Self::InvalidRequest | Self::PayloadTooComplex => 400,
            Self::PayloadTooLarge => 413,
            Self::Internal => 500,
            Self::MethodNotFound | Self::InvalidParameter | Self::ToolExecutionFailed => 200,
        }
    }

    /// Short human-readable name
    pub const fn description(self) -> &'static str {
        match self {
            Self::ParseError => "parse error",
            Self::InvalidRequest => "invalid request",
            Self::MethodNotFound => "method not found",
            Self::InvalidParameter => "invalid parameter",
            Self::Internal => "internal error",
            Self::ToolExecutionFailed => "tool execution failed",
            Self::PayloadTooLarge => "payload too large",
            Self::PayloadTooComplex => "payload too complex",
        }
    }
}

/// Client-facing error. The message is always safe to send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct McpError {
    /// Error classification
    pub kind: ErrorKind,
    /// Message sent to the client
    pub message: String,
}

impl McpError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Body could not be parsed as JSON
    pub fn parse_error() -> Self {
        Self::new(ErrorKind::ParseError, "Parse error")
    }

    /// Body is not a JSON-RPC 2.0 request
    pub fn invalid_request() -> Self {
        Self::new(ErrorKind::InvalidRequest, "Invalid Request")
    }

    /// Unknown JSON-RPC method
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorKind::MethodNotFound,
            format!("Method not found: {method}"),
        )
    }

    /// Unknown tool name
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorKind::InvalidParameter, format!("Unknown tool: {name}"))
    }

    /// Any other caller-side parameter problem
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    /// Tool handler failed; `message` must already be sanitized
    pub fn tool_execution_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ToolExecutionFailed, message)
    }

    /// Internal failure outside tool execution; `message` must already be sanitized
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Body size above the limit
    pub fn payload_too_large(err: &PayloadError) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, err.to_string())
    }

    /// Body structure above a limit
    pub fn payload_too_complex(err: &ComplexityError) -> Self {
        Self::new(
            ErrorKind::PayloadTooComplex,
            format!("Payload complexity validation failed: {err}"),
        )
    }

    /// JSON-RPC code for this error
    pub const fn jsonrpc_error_code(&self) -> i32 {
        self.kind.jsonrpc_error_code()
    }

    /// HTTP status for this error at the boundary
    pub const fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// Wire form of this error
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        JsonRpcError::new(self.jsonrpc_error_code(), self.message.clone())
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self::new(err.jsonrpc_error_code(), err.message)
    }
}

/// Failure raised by a tool handler.
///
/// Never shown to clients; routed through [`sanitize`](crate::sanitize).
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// `arguments` was present but not a JSON object
    #[error("tool arguments must be a JSON object, got {found}")]
    ArgumentsNotObject {
        /// JSON type that was supplied
        found: &'static str,
    },
    /// An argument had the wrong JSON type or an out-of-range value
    #[error("argument `{name}` must be {expected}, got {found}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Expected type or value set
        expected: &'static str,
        /// What was supplied
        found: String,
    },
    /// Any other handler failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result of a registry call
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// A required argument was not supplied
    #[error("Missing required argument `{argument}` for tool {tool}")]
    MissingArgument {
        /// Tool name
        tool: String,
        /// Argument name
        argument: String,
    },
    /// The handler ran and failed
    #[error("Tool {tool} failed: {source}")]
    Execution {
        /// Tool name
        tool: String,
        /// Handler failure
        #[source]
        source: ToolError,
    },
}

impl CallError {
    /// Whether the message may be sent to the client as is
    pub const fn is_expected(&self) -> bool {
        !matches!(self, Self::Execution { .. })
    }
}

/// JSON type name used in argument error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

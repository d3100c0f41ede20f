//! # STRIDE MCP Core
//!
//! Transport-agnostic core of the STRIDE threat-modeling MCP server.
//!
//! A request flows through the pieces of this crate in order:
//!
//! ```text
//! raw body ─▶ PayloadGuard::check_size ─▶ parse ─▶ PayloadGuard::validate_complexity
//!          ─▶ JsonRpcRequest::from_value ─▶ Dispatcher ─▶ ToolRegistry ─▶ JsonRpcResponse
//! ```
//!
//! Any failure raised from handler code goes through [`sanitize`] before it
//! reaches the wire, so clients only ever see a generic message and a
//! correlation id.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stridemcp_core::{
//!     Dispatcher, McpService, PayloadLimits, ServerInfo, Tool, ToolArguments, ToolError,
//!     ToolInputSchema, ToolOutput, ToolRegistry,
//! };
//!
//! let registry = ToolRegistry::builder()
//!     .tool(
//!         Tool::new("echo", "Echo the arguments back", ToolInputSchema::empty()),
//!         |args: &ToolArguments| -> Result<ToolOutput, ToolError> {
//!             Ok(ToolOutput::Structured(args.to_value()))
//!         },
//!     )
//!     .build()?;
//!
//! let service = McpService::new(
//!     PayloadLimits::default(),
//!     Dispatcher::new(Arc::new(registry), ServerInfo::default()),
//! );
//! let reply = service.handle_body(br#"{"jsonrpc":"2.0","method":"tools/list","id":1}"#);
//! assert_eq!(reply.status, 200);
//! # Ok::<(), stridemcp_core::RegistryError>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod arguments;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod jsonrpc;
pub mod limits;
pub mod registry;
pub mod sanitize;
pub mod service;
pub mod types;

pub use arguments::ToolArguments;
pub use dispatch::Dispatcher;
pub use error::{CallError, ErrorKind, McpError, McpResult, ToolError};
pub use guard::{ComplexityError, ComplexityReport, PayloadError, PayloadGuard};
pub use jsonrpc::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ResponsePayload};
pub use limits::PayloadLimits;
pub use registry::{RegistryError, ToolHandler, ToolRegistry, ToolRegistryBuilder};
pub use sanitize::{SanitizedError, sanitize, sanitize_panic};
pub use service::{McpService, ServiceResponse};
pub use types::{
    CallToolResult, Content, InitializeResult, PROTOCOL_VERSION, ServerInfo, Tool,
    ToolInputSchema, ToolOutput,
};

//! Transport-agnostic request pipeline.
//!
//! [`McpService::handle_body`] runs the full sequence a POST body goes
//! through: size check, JSON parse, complexity check, envelope check and
//! dispatch. Each rejection carries the HTTP status the boundary should use.

use crate::dispatch::Dispatcher;
use crate::error::McpError;
use crate::guard::PayloadGuard;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, request_id};
use crate::limits::PayloadLimits;
use crate::types::SERVER_DESCRIPTION;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Value, json};

/// Top-level `id` of a request, every other member skipped
#[derive(Deserialize)]
struct EnvelopeId {
    #[serde(default)]
    id: Value,
}

/// Path served by the POST endpoint, as listed in the capability summary
pub const ENDPOINT_PATH: &str = "/";

/// Response plus the HTTP status it should travel with
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON-RPC response body
    pub body: JsonRpcResponse,
}

impl ServiceResponse {
    fn ok(body: JsonRpcResponse) -> Self {
        Self { status: 200, body }
    }

    fn rejected(id: Value, err: McpError) -> Self {
        Self {
            status: err.http_status(),
            body: JsonRpcResponse::error(id, err),
        }
    }
}

/// Guard and dispatcher wired together
#[derive(Debug, Clone)]
pub struct McpService {
    guard: PayloadGuard,
    dispatcher: Dispatcher,
}

impl McpService {
    /// Create a service enforcing `limits` in front of `dispatcher`
    pub fn new(limits: PayloadLimits, dispatcher: Dispatcher) -> Self {
        Self {
            guard: PayloadGuard::new(limits),
            dispatcher,
        }
    }

    /// Limits enforced by this service
    pub fn limits(&self) -> &PayloadLimits {
        self.guard.limits()
    }

    /// Reject a declared `Content-Length` before the body is read.
    ///
    /// An absent length passes; the body read itself is bounded separately.
    pub fn check_declared_length(&self, declared: Option<u64>) -> Result<(), ServiceResponse> {
        match declared {
            Some(length) => self.guard.check_size(length).map_err(|err| {
                ServiceResponse::rejected(Value::Null, McpError::payload_too_large(&err))
            }),
            None => Ok(()),
        }
    }

    /// Process one raw request body.
    pub fn handle_body(&self, body: &[u8]) -> ServiceResponse {
        let length = u64::try_from(body.len()).unwrap_or(u64::MAX);
        if let Err(rejection) = self.check_declared_length(Some(length)) {
            return rejection;
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(value) => self.handle_value(&value),
            Err(err) => self.reject_unparsed(body, &err),
        }
    }

    /// Classify a body the `Value` parser refused.
    ///
    /// Well-formed JSON nested past the parser's recursion limit is a depth
    /// violation, not a parse error. Skipping a value in serde_json is
    /// iterative, so syntax can still be checked at any depth.
    fn reject_unparsed(&self, body: &[u8], err: &serde_json::Error) -> ServiceResponse {
        if serde_json::from_slice::<IgnoredAny>(body).is_ok()
            && let Err(complexity) = self.guard.check_raw_depth(body)
        {
            let is_object = body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{');
            let id = serde_json::from_slice::<EnvelopeId>(body)
                .ok()
                .filter(|_| is_object)
                .map_or(Value::Null, |envelope| envelope.id);
            tracing::warn!(reason = %complexity, "rejecting deeply nested payload");
            return ServiceResponse::rejected(id, McpError::payload_too_complex(&complexity));
        }
        tracing::debug!(bytes = body.len(), error = %err, "rejecting unparseable body");
        ServiceResponse::rejected(Value::Null, McpError::parse_error())
    }

    /// Process an already-parsed body.
    pub fn handle_value(&self, value: &Value) -> ServiceResponse {
        if let Err(err) = self.guard.validate_complexity(value) {
            tracing::warn!(reason = %err, "rejecting complex payload");
            return ServiceResponse::rejected(
                request_id(value),
                McpError::payload_too_complex(&err),
            );
        }

        let request = match JsonRpcRequest::from_value(value) {
            Ok(request) => request,
            Err(err) => return ServiceResponse::rejected(request_id(value), err),
        };

        tracing::debug!(method = %request.method, "dispatching request");
        ServiceResponse::ok(self.dispatcher.dispatch(request))
    }

    /// Informational summary served on GET
    pub fn summary(&self) -> Value {
        let info = self.dispatcher.server_info();
        json!({
            "name": info.name,
            "version": info.version,
            "description": SERVER_DESCRIPTION,
            "tools": self.dispatcher.registry().names().collect::<Vec<_>>(),
            "endpoints": {
                format!("POST {ENDPOINT_PATH}"): "MCP JSON-RPC endpoint"
            }
        })
    }
}

//! HTTP transport.
//!
//! JSON-RPC over `POST /` and `POST /mcp`; `GET` on the same paths returns
//! the capability summary. Every response carries CORS and security headers.
//! A panic while handling a request becomes a sanitized JSON-RPC internal
//! error with HTTP 500.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use stridemcp_core::{
    Dispatcher, JsonRpcResponse, McpError, McpService, RegistryError, ServerInfo, ServiceResponse,
    sanitize_panic,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServerConfig};

/// Context recorded with sanitized panics
const PANIC_CONTEXT: &str = "HTTP POST request handling";

/// Server startup and runtime errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tool catalogue failed to build
    #[error("Failed to build tool registry: {0}")]
    Registry(#[from] RegistryError),

    /// Listener could not bind
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Requested address
        address: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the JSON-RPC service with the full tool catalogue
pub fn build_service(config: &ServerConfig) -> Result<McpService, ServerError> {
    let registry = Arc::new(stridemcp_tools::catalog()?);
    let dispatcher = Dispatcher::new(registry, ServerInfo::default());
    Ok(McpService::new(config.limits, dispatcher))
}

/// Axum router for `service` with all middleware attached
pub fn router(service: Arc<McpService>) -> Router {
    let body_limit = service.limits().max_payload_size_usize();

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("mcp-session-id"),
        ]);

    Router::new()
        .route("/", get(summary).post(json_rpc).options(preflight))
        .route("/mcp", get(summary).post(json_rpc).options(preflight))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .with_state(service)
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let address = config.socket_addr()?;
    let service = Arc::new(build_service(config)?);
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;

    tracing::info!(
        address = %address,
        max_payload_size = config.limits.max_payload_size,
        "STRIDE MCP server listening on http://{}",
        address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn json_rpc(
    State(service): State<Arc<McpService>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let declared = content_length(&headers);
    if let Err(rejection) = service.check_declared_length(declared) {
        return into_http(rejection);
    }

    match body {
        Ok(bytes) => into_http(service.handle_body(&bytes)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            // No usable Content-Length; the read stopped one byte past the limit.
            let observed = service.limits().max_payload_size.saturating_add(1);
            match service.check_declared_length(Some(observed)) {
                Err(response) => into_http(response),
                Ok(()) => rejection.into_response(),
            }
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "failed to read request body");
            let response = JsonRpcResponse::error(serde_json::Value::Null, McpError::parse_error());
            json_response(StatusCode::BAD_REQUEST, &response)
        }
    }
}

async fn summary(State(service): State<Arc<McpService>>) -> Response {
    match serde_json::to_string_pretty(&service.summary()) {
        Ok(text) => ([(header::CONTENT_TYPE, "application/json")], text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render summary");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn into_http(response: ServiceResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, &response.body)
}

fn json_response(status: StatusCode, body: &JsonRpcResponse) -> Response {
    (status, axum::Json(body)).into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let sanitized = sanitize_panic(&*payload, PANIC_CONTEXT);
    let body = JsonRpcResponse::error(
        serde_json::Value::Null,
        McpError::internal(sanitized.message),
    );
    json_response(StatusCode::INTERNAL_SERVER_ERROR, &body)
}

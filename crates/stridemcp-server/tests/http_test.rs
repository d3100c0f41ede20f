//! HTTP behaviour of the router, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use stridemcp_core::{
    Dispatcher, McpService, PayloadLimits, ServerInfo, Tool, ToolArguments, ToolError,
    ToolInputSchema, ToolOutput, ToolRegistry,
};
use stridemcp_server::{ServerConfig, build_service, router};
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(build_service(&ServerConfig::default()).unwrap()))
}

fn app_with_limits(limits: PayloadLimits) -> Router {
    let config = ServerConfig::builder().limits(limits).build();
    router(Arc::new(build_service(&config).unwrap()))
}

fn post(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn test_tools_list_over_http() {
    let (status, _, body) = send(
        app(),
        post("/", r#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_mcp_path_is_equivalent() {
    let request = r#"{"jsonrpc":"2.0","method":"initialize","id":"a"}"#;
    let (_, _, root) = send(app(), post("/", request)).await;
    let (_, _, mcp) = send(app(), post("/mcp", request)).await;
    assert_eq!(root, mcp);
    assert_eq!(mcp["result"]["protocolVersion"], stridemcp_core::PROTOCOL_VERSION);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (_, headers, _) = send(
        app(),
        post("/", r#"{"jsonrpc":"2.0","method":"tools/list","id":1}"#),
    )
    .await;

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/")
        .header(header::ORIGIN, "https://client.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_plain_options_is_ok() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/mcp")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_returns_summary() {
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body["tools"].as_array().unwrap().len(), 8);
    assert!(body["endpoints"].get("POST /").is_some());
}

#[tokio::test]
async fn test_parse_error() {
    let (status, _, body) = send(app(), post("/", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_invalid_request_envelope() {
    let request = post("/", r#"{"jsonrpc":"1.0","method":"tools/list","id":4}"#);
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["id"], 4);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let limits = PayloadLimits::default().with_max_payload_size(64);
    let body = format!(
        r#"{{"jsonrpc":"2.0","method":"tools/list","id":1,"pad":"{}"}}"#,
        "x".repeat(128)
    );
    let (status, _, body) = send(app_with_limits(limits), post("/", body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["id"], Value::Null);
    assert!(body["error"]["message"].as_str().unwrap().contains("exceeds maximum"));
}

#[tokio::test]
async fn test_declared_length_rejected_before_read() {
    let limits = PayloadLimits::default().with_max_payload_size(64);
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_LENGTH, "1000000")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _, body) = send(app_with_limits(limits), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"]["message"].as_str().unwrap().contains("1000000"));
}

#[tokio::test]
async fn test_complex_payload_rejected() {
    let mut nested = json!(1);
    for _ in 0..25 {
        nested = json!([nested]);
    }
    let request = json!({
        "jsonrpc": "2.0",
        "method": "tools/list",
        "params": {"n": nested},
        "id": 7
    });
    let (status, _, body) = send(app(), post("/", request.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["id"], 7);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Payload complexity validation failed:"));
    assert!(message.contains("depth"));
}

#[tokio::test]
async fn test_nesting_beyond_parser_limit_echoes_id() {
    let nested = format!("{}1{}", "[".repeat(200), "]".repeat(200));
    let body = format!(
        r#"{{"jsonrpc":"2.0","method":"tools/list","params":{{"n":{nested}}},"id":7}}"#
    );
    let (status, _, body) = send(app(), post("/", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["id"], 7);
    assert_eq!(body["error"]["code"], -32600);
    assert!(body["error"]["message"].as_str().unwrap().contains("depth"));
}

#[tokio::test]
async fn test_tool_call_report() {
    let request = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {
            "name": "generate_threat_report",
            "arguments": {"threat_model": [{"id": "T1"}, {"id": "T2"}]}
        },
        "id": 6
    });
    let (status, _, body) = send(app(), post("/", request.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("# STRIDE Threat Model Report"));
    assert!(text.contains("Total Threats Identified:** 2"));
}

#[tokio::test]
async fn test_handler_panic_is_sanitized() {
    let registry = ToolRegistry::builder()
        .tool(
            Tool::new("explode", "Panics", ToolInputSchema::empty()),
            |_: &ToolArguments| -> Result<ToolOutput, ToolError> {
                panic!("DB failed at /secret/path.py")
            },
        )
        .build()
        .unwrap();
    let service = McpService::new(
        PayloadLimits::default(),
        Dispatcher::new(Arc::new(registry), ServerInfo::default()),
    );
    let request = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {"name": "explode", "arguments": {}},
        "id": 3
    });
    let (status, headers, body) =
        send(router(Arc::new(service)), post("/", request.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(body["id"], Value::Null);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Error ID:"));
    assert!(!message.contains("/secret/path.py"));
}

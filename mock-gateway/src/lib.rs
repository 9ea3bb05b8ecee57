//! Mock gateway invocation transport for exercising the proxy core.
//!
//! # Design
//! Emulates the gateway's invoke API: POST an event to
//! `/2015-03-31/functions/{name}/invocations` and the named handler runs
//! against a fresh `ProxyResponseWriter`, with the exported `ProxyResponse`
//! returned as JSON. Core validation errors surface as 502 carrying the
//! error message, the way a real transport reports a handler that produced
//! no usable response. Handlers are plain synchronous closures; the buffer
//! contract is single-writer, so every invocation gets its own writer.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use gateway_core::{
    HandlerRequest, ProxyError, ProxyRequest, ProxyResponseWriter, RequestAccessor,
};

/// A registered handler: consumes the converted request and writes into
/// the response buffer.
pub type Handler = Arc<dyn Fn(&HandlerRequest, &mut ProxyResponseWriter) + Send + Sync>;

type Registry = Arc<HashMap<String, Handler>>;

pub fn app() -> Router {
    Router::new()
        .route("/2015-03-31/functions/{name}/invocations", post(invoke))
        .with_state(registry())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Built-in demo handlers covering the response shapes the core produces:
/// plain text, JSON, explicit status, binary echo, and a handler that
/// writes nothing at all.
fn registry() -> Registry {
    let mut handlers: HashMap<String, Handler> = HashMap::new();
    handlers.insert("hello".to_string(), Arc::new(hello));
    handlers.insert("echo".to_string(), Arc::new(echo));
    handlers.insert("created".to_string(), Arc::new(created));
    handlers.insert("blob".to_string(), Arc::new(blob));
    handlers.insert("silent".to_string(), Arc::new(|_: &HandlerRequest, _: &mut ProxyResponseWriter| {}));
    Arc::new(handlers)
}

async fn invoke(
    State(handlers): State<Registry>,
    Path(name): Path<String>,
    Json(event): Json<ProxyRequest>,
) -> Response {
    let Some(handler) = handlers.get(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("function {name} not found") })),
        )
            .into_response();
    };

    let request = match RequestAccessor::new().handler_request(&event) {
        Ok(request) => request,
        Err(err) => return gateway_error(err),
    };

    let mut writer = ProxyResponseWriter::new();
    handler(&request, &mut writer);

    match writer.proxy_response() {
        Ok(response) => (
            StatusCode::OK,
            [("x-amzn-requestid", Uuid::new_v4().to_string())],
            Json(response),
        )
            .into_response(),
        Err(err) => gateway_error(err),
    }
}

/// How core validation failures reach the transport's caller: a 502 with
/// the error text.
fn gateway_error(err: ProxyError) -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({ "message": err.to_string() }))).into_response()
}

fn hello(_request: &HandlerRequest, writer: &mut ProxyResponseWriter) {
    writer.headers_mut().add("Content-Type", "text/plain");
    let _ = writer.write_all(b"hello");
}

fn echo(request: &HandlerRequest, writer: &mut ProxyResponseWriter) {
    writer.headers_mut().add("Content-Type", "application/json");
    let reflected = json!({
        "method": request.method,
        "path": request.path,
        "bodyLength": request.body.len(),
    });
    let _ = writer.write_all(reflected.to_string().as_bytes());
}

fn created(request: &HandlerRequest, writer: &mut ProxyResponseWriter) {
    writer.headers_mut().add("Content-Type", "application/json");
    writer.headers_mut().add("Location", "/orders/1");
    writer.write_status(201);
    let _ = writer.write_all(json!({ "path": request.path }).to_string().as_bytes());
}

/// Echoes the raw request body back as an octet stream; with a base64
/// event body this exercises binary decode and re-encode end to end.
fn blob(request: &HandlerRequest, writer: &mut ProxyResponseWriter) {
    writer.headers_mut().add("Content-Type", "application/octet-stream");
    let _ = writer.write_all(&request.body);
}

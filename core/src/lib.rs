//! Proxy-integration core for a serverless gateway.
//!
//! # Overview
//! Buffers everything an HTTP handler writes — headers, a status code, body
//! bytes — in memory, and exports the result on demand as a single gateway
//! proxy response (status, flattened header map, body string, base64 flag).
//! The inbound half converts a proxy event into the plain request value a
//! handler consumes. No I/O happens here; the invocation transport executes
//! around the core, keeping it deterministic and testable.
//!
//! # Design
//! - `ProxyResponseWriter` is the write sink: `std::io::Write` for the
//!   body, direct header-map access, explicit status writes. One writer is
//!   created per invocation, consumed by a single export, then discarded.
//! - Export is one-shot and fallible: a response with no headers or no
//!   established status is a caller error, reported as a value.
//! - Wire DTOs are plain serde types; integration tests pin the JSON shape
//!   against a mock gateway transport.

pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;

pub use error::ProxyError;
pub use http::{HandlerRequest, Headers};
pub use request::RequestAccessor;
pub use response::ProxyResponseWriter;
pub use types::{ProxyRequest, ProxyResponse, RequestContext};

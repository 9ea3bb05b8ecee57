//! Conversion from inbound proxy events to handler requests.
//!
//! # Design
//! `RequestAccessor` is the inbound counterpart of the response buffer: it
//! turns the gateway's `ProxyRequest` event into the plain `HandlerRequest`
//! a handler consumes, without performing any I/O. The only configuration
//! is an optional deployment base path stripped from event paths.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ProxyError;
use crate::http::{HandlerRequest, Headers};
use crate::types::ProxyRequest;

/// Converter from proxy events to handler requests.
#[derive(Debug, Clone, Default)]
pub struct RequestAccessor {
    strip_base_path: String,
}

impl RequestAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a deployment base path (for gateways mounted under a
    /// stage prefix) to strip from the front of event paths. The stored
    /// form is normalized to a single leading `/` and no trailing `/`;
    /// an empty or `/` argument disables stripping.
    pub fn strip_base_path(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        let strip_base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self { strip_base_path }
    }

    /// Build the request a handler consumes from the raw proxy event.
    ///
    /// Query string parameters are appended to the path in key order;
    /// multi-value headers are merged ahead of single-value ones; a body
    /// flagged as base64 is decoded, which is the only way this conversion
    /// can fail.
    pub fn handler_request(&self, event: &ProxyRequest) -> Result<HandlerRequest, ProxyError> {
        let mut path = self.stripped_path(&event.path);

        if let Some(params) = &event.query_string_parameters {
            if !params.is_empty() {
                let query: Vec<String> =
                    params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                path = format!("{path}?{}", query.join("&"));
            }
        }

        let mut headers = Headers::new();
        for (name, values) in &event.multi_value_headers {
            for value in values {
                headers.add(name, value);
            }
        }
        for (name, value) in &event.headers {
            if headers.get(name).is_none() {
                headers.add(name, value);
            }
        }

        let body = match &event.body {
            None => Vec::new(),
            Some(raw) if event.is_base64_encoded => STANDARD
                .decode(raw)
                .map_err(|e| ProxyError::InvalidBodyEncoding(e.to_string()))?,
            Some(raw) => raw.clone().into_bytes(),
        };

        Ok(HandlerRequest {
            method: event.http_method.clone(),
            path,
            headers,
            body,
        })
    }

    /// Strip the configured base path when it prefixes `path` on a segment
    /// boundary; the remainder keeps its leading `/`, and an exact match
    /// becomes `/`.
    fn stripped_path(&self, path: &str) -> String {
        if self.strip_base_path.is_empty() {
            return path.to_string();
        }
        if path == self.strip_base_path {
            return "/".to_string();
        }
        match path.strip_prefix(&self.strip_base_path) {
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }
}

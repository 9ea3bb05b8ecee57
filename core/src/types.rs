//! Wire DTOs for the gateway proxy-integration contract.
//!
//! # Design
//! These types mirror the gateway's JSON event and response shapes
//! (camelCase on the wire) but are defined independently of any transport
//! crate. Event maps use `BTreeMap` so iteration and serialization order
//! are deterministic; integration tests pin the exact field names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The structured value handed back across the gateway integration
/// boundary: status code, flattened single-value header map, body string,
/// and the flag marking whether `body` is base64-encoded binary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// An inbound proxy-integration event as delivered by the gateway.
///
/// Only `httpMethod` and `path` are guaranteed present; every other field
/// defaults when the gateway omits it. `headers` carries one value per
/// name, `multiValueHeaders` the full value lists — both are merged when
/// building the handler request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
}

/// Invocation metadata the gateway attaches to each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub request_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

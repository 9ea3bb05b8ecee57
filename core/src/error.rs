//! Error types for the proxy-integration core.
//!
//! # Design
//! The two export failures get dedicated variants because they carry exact,
//! contract-level messages that the transport surfaces verbatim to its
//! caller. `InvalidBodyEncoding` covers the one way an inbound event can be
//! malformed at this layer: a body flagged as base64 that does not decode.
//! All variants are caller-misuse conditions, never transient ones.

use std::fmt;

/// Errors returned when converting between proxy events and handler values.
#[derive(Debug)]
pub enum ProxyError {
    /// Export was attempted on a buffer whose header mapping is empty —
    /// the handler never set so much as a content type.
    NoHeaders,

    /// Export was attempted before any status was established, explicitly
    /// or implicitly through a body write.
    StatusNotSet,

    /// The event body was flagged as base64 but did not decode.
    InvalidBodyEncoding(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::NoHeaders => write!(f, "No headers generated for response"),
            ProxyError::StatusNotSet => write!(f, "Status code not set on response"),
            ProxyError::InvalidBodyEncoding(msg) => {
                write!(f, "invalid base64 request body: {msg}")
            }
        }
    }
}

impl std::error::Error for ProxyError {}

//! In-memory response buffer implementing the HTTP write-sink contract.
//!
//! # Design
//! `ProxyResponseWriter` accumulates everything a handler writes — headers,
//! a status code, body bytes — and converts the result into a
//! `ProxyResponse` in a single fallible step. Body writes go through
//! `std::io::Write`, so any code able to write to an ordinary HTTP response
//! sink can write here unchanged. The buffer holds no locks and belongs to
//! exactly one invocation; the export takes `&self` and returns a snapshot,
//! so an unmodified buffer exports the same value every time.

use std::collections::HashMap;
use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ProxyError;
use crate::http::Headers;
use crate::types::ProxyResponse;

/// Status a response assumes once body bytes arrive before any explicit
/// status write.
const DEFAULT_SUCCESS_STATUS: u16 = 200;

/// In-memory HTTP response sink, exported on demand as a gateway proxy
/// response.
///
/// A fresh writer has no status, an empty header mapping, and an empty
/// body. Writing body bytes marks an unset status as 200; `write_status`
/// is unconditional and last-write-wins, and later body writes never
/// change it back.
#[derive(Debug, Default)]
pub struct ProxyResponseWriter {
    status: Option<u16>,
    headers: Headers,
    body: Vec<u8>,
}

impl ProxyResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status as currently recorded; `None` until a status or body write.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The accumulated header mapping.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the header mapping. Callers may add, replace, or
    /// remove entries at any point before export.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Record `code` as the response status, overwriting the implicit 200
    /// from an earlier body write and any earlier explicit status.
    pub fn write_status(&mut self, code: u16) {
        self.status = Some(code);
    }

    /// Convert the accumulated state into a gateway proxy response.
    ///
    /// Fails when no header was ever set (`ProxyError::NoHeaders`) or when
    /// neither a status nor any body byte was written
    /// (`ProxyError::StatusNotSet`). On success the multi-valued header
    /// mapping is flattened to its first value per name, and the body is
    /// carried verbatim for textual content types or base64-encoded
    /// (standard alphabet, padded) otherwise.
    pub fn proxy_response(&self) -> Result<ProxyResponse, ProxyError> {
        if self.headers.is_empty() {
            return Err(ProxyError::NoHeaders);
        }
        let status_code = self.status.ok_or(ProxyError::StatusNotSet)?;

        let mut headers = HashMap::with_capacity(self.headers.len());
        for (name, values) in self.headers.iter() {
            if let Some(first) = values.first() {
                headers.insert(name.to_string(), first.clone());
            }
        }

        let (body, is_base64_encoded) = encode_body(self.headers.get("Content-Type"), &self.body);

        Ok(ProxyResponse {
            status_code,
            headers,
            body,
            is_base64_encoded,
        })
    }
}

/// The body sink. Writes always accept the full slice and never fail; the
/// first write marks an unset status as 200.
impl Write for ProxyResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(DEFAULT_SUCCESS_STATUS);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pick the wire representation of the body.
///
/// Textual content types keep the body verbatim; everything else is
/// base64-encoded. A missing Content-Type is attempted as text, and a
/// textual body that is not valid UTF-8 still falls back to base64 with
/// the flag set, since the verbatim representation cannot hold it.
fn encode_body(content_type: Option<&str>, body: &[u8]) -> (String, bool) {
    if content_type.map_or(true, is_text_content_type) {
        if let Ok(text) = String::from_utf8(body.to_vec()) {
            return (text, false);
        }
    }
    (STANDARD.encode(body), true)
}

/// Textual content types: `text/*`, the common textual `application/*`
/// subtypes, and `+json` / `+xml` structured suffixes. Parameters after
/// `;` are ignored; everything else counts as binary.
fn is_text_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase();
    essence.starts_with("text/")
        || essence.ends_with("+json")
        || essence.ends_with("+xml")
        || matches!(
            essence.as_str(),
            "application/json"
                | "application/javascript"
                | "application/xml"
                | "application/xhtml+xml"
                | "application/x-www-form-urlencoded"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::RngCore;

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        bytes
    }

    #[test]
    fn fresh_writer_has_unset_status_and_empty_headers() {
        let writer = ProxyResponseWriter::new();
        assert_eq!(writer.status(), None);
        assert!(writer.headers().is_empty());
        assert_eq!(writer.headers().len(), 0);
    }

    #[test]
    fn adding_a_header_stores_the_exact_value() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "application/json");
        assert_eq!(writer.headers().len(), 1);
        assert_eq!(
            writer.headers().get_all("Content-Type").unwrap(),
            &["application/json".to_string()]
        );
    }

    #[test]
    fn write_accepts_the_full_slice() {
        let mut writer = ProxyResponseWriter::new();
        let body = random_bytes(256);
        let written = writer.write(&body).unwrap();
        assert_eq!(written, body.len());
    }

    #[test]
    fn write_marks_unset_status_as_200() {
        let mut writer = ProxyResponseWriter::new();
        writer.write_all(b"partial").unwrap();
        assert_eq!(writer.status(), Some(200));
    }

    #[test]
    fn explicit_status_overrides_the_implicit_default() {
        let mut writer = ProxyResponseWriter::new();
        writer.write_all(b"body").unwrap();
        writer.write_status(202);
        assert_eq!(writer.status(), Some(202));
    }

    #[test]
    fn later_body_writes_do_not_reset_an_explicit_status() {
        let mut writer = ProxyResponseWriter::new();
        writer.write_status(404);
        writer.write_all(b"not found").unwrap();
        assert_eq!(writer.status(), Some(404));
    }

    #[test]
    fn repeated_status_writes_last_one_wins() {
        let mut writer = ProxyResponseWriter::new();
        writer.write_status(500);
        writer.write_status(201);
        assert_eq!(writer.status(), Some(201));
    }

    #[test]
    fn export_refuses_a_response_with_no_headers() {
        let writer = ProxyResponseWriter::new();
        let err = writer.proxy_response().unwrap_err();
        assert!(matches!(err, ProxyError::NoHeaders));
        assert_eq!(err.to_string(), "No headers generated for response");
    }

    #[test]
    fn export_refuses_a_response_with_no_status() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "application/json");
        let err = writer.proxy_response().unwrap_err();
        assert!(matches!(err, ProxyError::StatusNotSet));
        assert_eq!(err.to_string(), "Status code not set on response");
    }

    #[test]
    fn text_body_exports_verbatim() {
        let mut writer = ProxyResponseWriter::new();
        writer.write_all(b"hello").unwrap();
        writer.headers_mut().add("Content-Type", "text/plain");

        let response = writer.proxy_response().unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "hello");
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.headers["Content-Type"], "text/plain");
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn binary_body_exports_as_standard_base64() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "application/octet-stream");
        let body = random_bytes(256);
        writer.write_all(&body).unwrap();
        writer.write_status(202);

        let response = writer.proxy_response().unwrap();
        assert_eq!(response.status_code, 202);
        assert!(response.is_base64_encoded);
        assert_eq!(response.body, STANDARD.encode(&body));
        assert_eq!(response.body.len(), body.len().div_ceil(3) * 4);
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.headers["Content-Type"], "application/octet-stream");
    }

    #[test]
    fn export_is_a_snapshot_and_idempotent() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "text/plain");
        writer.write_all(b"same").unwrap();

        let first = writer.proxy_response().unwrap();
        let second = writer.proxy_response().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flattening_keeps_the_first_value_per_name() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "text/plain");
        writer.headers_mut().add("Set-Cookie", "a=1");
        writer.headers_mut().add("Set-Cookie", "b=2");
        writer.write_all(b"ok").unwrap();

        let response = writer.proxy_response().unwrap();
        assert_eq!(response.headers["Set-Cookie"], "a=1");
        assert_eq!(response.headers.len(), 2);
    }

    #[test]
    fn content_type_lookup_ignores_case_and_parameters() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("content-type", "Text/HTML; charset=utf-8");
        writer.write_all(b"<p>hi</p>").unwrap();

        let response = writer.proxy_response().unwrap();
        assert!(!response.is_base64_encoded);
        assert_eq!(response.body, "<p>hi</p>");
    }

    #[test]
    fn json_content_type_is_textual() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "application/json");
        writer.write_all(br#"{"ok":true}"#).unwrap();

        let response = writer.proxy_response().unwrap();
        assert!(!response.is_base64_encoded);
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[test]
    fn structured_suffix_types_are_textual() {
        assert!(is_text_content_type("application/problem+json"));
        assert!(is_text_content_type("application/atom+xml"));
        assert!(!is_text_content_type("application/octet-stream"));
        assert!(!is_text_content_type("image/png"));
    }

    #[test]
    fn missing_content_type_with_utf8_body_stays_text() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("X-Handler", "bare");
        writer.write_all(b"plain enough").unwrap();

        let response = writer.proxy_response().unwrap();
        assert!(!response.is_base64_encoded);
        assert_eq!(response.body, "plain enough");
    }

    #[test]
    fn textual_content_type_with_invalid_utf8_falls_back_to_base64() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "text/plain");
        let body = [0xff, 0xfe, 0xfd];
        writer.write_all(&body).unwrap();

        let response = writer.proxy_response().unwrap();
        assert!(response.is_base64_encoded);
        assert_eq!(response.body, STANDARD.encode(body));
    }

    #[test]
    fn writes_append_in_call_order() {
        let mut writer = ProxyResponseWriter::new();
        writer.headers_mut().add("Content-Type", "text/plain");
        writer.write_all(b"hello, ").unwrap();
        writer.write_all(b"world").unwrap();

        let response = writer.proxy_response().unwrap();
        assert_eq!(response.body, "hello, world");
    }
}

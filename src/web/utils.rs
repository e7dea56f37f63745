use axum::{http::header, response::{IntoResponse, Response}};
use bytes::Bytes;

pub fn html_bytes(content: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], content).into_response()
}

/// The requested hash is echoed back in error text, so never verbatim.
pub fn escaped_hash(raw: &str) -> String {
    html_escape::encode_text(raw.trim()).into_owned()
}

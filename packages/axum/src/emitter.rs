//! Turns finished payloads into axum responses.

use apishape::response::{JSONP_CONTENT_TYPE, JSON_CONTENT_TYPE};
use apishape::{encode_body, Headers, ResponseEmitter};
use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::Value;

/// [`ResponseEmitter`] for axum.
///
/// The content type is set before caller headers are applied, so a caller
/// may override it. Header names or values that are not valid HTTP are
/// skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxumEmitter;

impl ResponseEmitter for AxumEmitter {
    type Output = Response;

    fn json(&self, body: Option<Value>, status: u16, headers: Headers) -> Response {
        build(body, None, status, headers)
    }

    fn jsonp(&self, callback: &str, body: Option<Value>, status: u16, headers: Headers) -> Response {
        build(body, Some(callback), status, headers)
    }
}

fn build(body: Option<Value>, callback: Option<&str>, status: u16, headers: Headers) -> Response {
    let content_type = match (&body, callback) {
        (None, _) => None,
        (Some(_), Some(_)) => Some(JSONP_CONTENT_TYPE),
        (Some(_), None) => Some(JSON_CONTENT_TYPE),
    };

    let mut response = Response::new(Body::from(encode_body(body.as_ref(), callback)));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or_else(|_| {
        tracing::warn!(status, "invalid status code, sending 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let out = response.headers_mut();
    if let Some(content_type) = content_type {
        out.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    for (name, value) in headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                out.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid response header"),
        }
    }
    response
}

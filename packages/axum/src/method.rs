//! HTML-form method override.
//!
//! Browsers can only send GET and POST, so a form posts with a `_method`
//! field (or a client sets `x-http-method-override`) naming the verb it
//! means. Only PUT, PATCH and DELETE may be requested this way.

use axum::http::{HeaderMap, Method};

/// Input field naming the intended method.
pub const METHOD_OVERRIDE_PARAM: &str = "_method";
/// Header naming the intended method.
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// Parse an override value. Anything other than put/patch/delete (in any
/// case) is ignored.
pub fn parse_override(value: &str) -> Option<Method> {
    let value = value.trim();
    [Method::PUT, Method::PATCH, Method::DELETE]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(value))
}

/// The override carried by the request headers, if any.
pub fn header_override(headers: &HeaderMap) -> Option<Method> {
    headers
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_override)
}

pub fn is_update_method(method: &Method) -> bool {
    *method == Method::PUT || *method == Method::PATCH
}

pub fn is_delete_method(method: &Method) -> bool {
    *method == Method::DELETE
}

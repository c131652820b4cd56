//! Boundary errors and their translation into HTTP status codes.
//!
//! Framework and storage layers convert whatever they caught into an
//! [`ApiException`] with a coarse [`ErrorKind`]; [`translate_status`] then
//! picks the status code for the error envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a caught error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A record lookup found nothing.
    ModelNotFound,
    /// No route matched the request.
    RouteNotFound,
    /// Anything else.
    Other,
}

impl ErrorKind {
    pub fn is_not_found(self) -> bool {
        matches!(self, ErrorKind::ModelNotFound | ErrorKind::RouteNotFound)
    }
}

/// An error handed to the builder's error responders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiException {
    pub kind: ErrorKind,
    /// Explicit status code carried by the error, if any. `0` and `-1`
    /// mean "no code".
    pub code: Option<i64>,
    pub message: String,
}

impl ApiException {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn model_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelNotFound, message)
    }

    pub fn route_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RouteNotFound, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, message)
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// The carried code, if it is set, not a sentinel, and a valid HTTP
    /// status (100..=999).
    pub fn usable_code(&self) -> Option<u16> {
        let code = self.code.filter(|c| *c != 0 && *c != -1)?;
        match u16::try_from(code) {
            Ok(status) if (100..=999).contains(&status) => Some(status),
            _ => {
                tracing::warn!(code, "ignoring exception code outside the HTTP status range");
                None
            }
        }
    }
}

/// Pick the status code for `exception` given the builder's `current` status.
///
/// First match wins:
/// 1. the exception's own usable code;
/// 2. `current`, when something already moved it off 200;
/// 3. 404 for not-found kinds;
/// 4. 400.
pub fn translate_status(exception: &ApiException, current: u16) -> u16 {
    if let Some(code) = exception.usable_code() {
        return code;
    }
    if current != 200 {
        return current;
    }
    if exception.kind.is_not_found() {
        return 404;
    }
    400
}

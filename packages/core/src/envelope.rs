//! Typed views of the default envelopes.
//!
//! These mirror the stock `successFormat` and `errorFormat` templates. They
//! are convenient for clients and tests that decode responses; deployments
//! with custom templates decode into their own types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{code, message}` pair inside either envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeBody {
    pub code: u16,
    /// A string, or a structured value such as per-field validation errors.
    pub message: Value,
}

impl EnvelopeBody {
    pub fn new(code: u16, message: impl Into<Value>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The message when it is a plain string.
    pub fn message_str(&self) -> Option<&str> {
        self.message.as_str()
    }
}

/// `{"success": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub success: EnvelopeBody,
}

impl SuccessEnvelope {
    pub fn new(code: u16, message: impl Into<Value>) -> Self {
        Self {
            success: EnvelopeBody::new(code, message),
        }
    }
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: EnvelopeBody,
}

impl ErrorEnvelope {
    pub fn new(code: u16, message: impl Into<Value>) -> Self {
        Self {
            error: EnvelopeBody::new(code, message),
        }
    }
}

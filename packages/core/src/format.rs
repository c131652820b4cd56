//! Placeholder substitution for message envelopes.
//!
//! A template is a JSON object. Any string leaf that is exactly `:message`
//! or `:code` is replaced; every other leaf is copied untouched. Strings
//! that merely contain a placeholder (`"Error: :message"`) are not
//! interpolated.

use serde_json::Value;

use crate::attr::AttributeMap;

pub const MESSAGE_PLACEHOLDER: &str = ":message";
pub const CODE_PLACEHOLDER: &str = ":code";

/// Render `template` with `message` and the status `code`.
///
/// Substitution recurses through nested objects and arrays.
pub fn format_payload(message: &Value, code: u16, template: &AttributeMap) -> AttributeMap {
    template
        .iter()
        .map(|(key, value)| (key.clone(), substitute(value, message, code)))
        .collect()
}

fn substitute(value: &Value, message: &Value, code: u16) -> Value {
    match value {
        Value::String(s) if s == MESSAGE_PLACEHOLDER => message.clone(),
        Value::String(s) if s == CODE_PLACEHOLDER => Value::from(code),
        Value::Object(map) => Value::Object(format_payload(message, code, map)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute(item, message, code))
                .collect(),
        ),
        other => other.clone(),
    }
}

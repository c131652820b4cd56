//! Attribute maps and the coercions transformers apply to raw fields.
//!
//! An [`AttributeMap`] is an insertion-ordered JSON object. It is the output
//! of every [`Transformer`](crate::Transformer) and also the shape of the
//! configured message templates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered mapping of string keys to JSON values.
pub type AttributeMap = Map<String, Value>;

/// How timestamps are rendered in transformed output.
///
/// One format is chosen per deployment (see
/// [`ApiConfig::timestamps`](crate::ApiConfig::timestamps)) and every
/// transformer renders through [`timestamp`] so the two never mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// RFC 3339 / ISO 8601 UTC string, second precision (`2026-02-18T12:00:00Z`).
    #[default]
    Iso8601,
    /// Integer seconds since the Unix epoch.
    Unix,
}

/// Render a timestamp in the deployment's format.
pub fn timestamp(at: &DateTime<Utc>, format: TimestampFormat) -> Value {
    match format {
        TimestampFormat::Iso8601 => Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        TimestampFormat::Unix => Value::from(at.timestamp()),
    }
}

/// Normalize a loosely typed flag column to a boolean.
///
/// `true`, non-zero numbers, and the strings `"1"`/`"true"` are truthy;
/// everything else (including `null`) is `false`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    }
}

/// Unwrap a `json!` object literal into an [`AttributeMap`].
///
/// `null` becomes an empty map.
///
/// # Panics
///
/// Panics if `value` is neither an object nor `null`; passing a scalar or
/// array where a map is expected is a programming error.
pub fn object(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        Value::Null => AttributeMap::new(),
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn iso8601_timestamp_is_utc_string() {
        assert_eq!(
            timestamp(&at(), TimestampFormat::Iso8601),
            json!("2026-02-18T12:00:00Z")
        );
    }

    #[test]
    fn unix_timestamp_is_integer_seconds() {
        assert_eq!(timestamp(&at(), TimestampFormat::Unix), json!(1_771_416_000));
    }

    #[test]
    fn truthy_accepts_flag_columns() {
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("1")));
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn object_keeps_insertion_order() {
        let map = object(json!({"z": 1, "a": 2}));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
        assert!(object(Value::Null).is_empty());
    }

    #[test]
    #[should_panic(expected = "expected a JSON object")]
    fn object_rejects_scalars() {
        object(json!(3));
    }
}

//! Field rules for request input and the error map they produce.
//!
//! A failed check is answered by [`Api::fail_validation`](crate::Api::fail_validation):
//! a 422 error envelope on API routes, a redirect back elsewhere.

use std::collections::BTreeMap;

use apishape::{AttributeMap, ErrorPayload};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One constraint on an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not null, blank, or an empty list.
    Required,
    /// At least this many characters (strings), items (lists), or this value
    /// (numbers).
    Min(usize),
    /// `true`, `false`, `0`, `1`, `"0"` or `"1"`.
    Boolean,
}

impl Rule {
    /// Rules other than `Required` only run when the field has a value.
    fn is_implicit(self) -> bool {
        matches!(self, Rule::Required)
    }

    fn check(self, label: &str, value: Option<&Value>) -> Option<String> {
        match self {
            Rule::Required => (!is_filled(value)).then(|| format!("The {label} field is required.")),
            Rule::Min(min) => match value? {
                Value::String(s) if s.chars().count() < min => {
                    Some(format!("The {label} must be at least {min} characters."))
                }
                Value::Array(items) if items.len() < min => {
                    Some(format!("The {label} must have at least {min} items."))
                }
                Value::Number(n) if n.as_f64().is_some_and(|f| f < min as f64) => {
                    Some(format!("The {label} must be at least {min}."))
                }
                _ => None,
            },
            Rule::Boolean => {
                let ok = match value? {
                    Value::Bool(_) => true,
                    Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
                    Value::String(s) => matches!(s.as_str(), "0" | "1"),
                    _ => false,
                };
                (!ok).then(|| format!("The {label} field must be true or false."))
            }
        }
    }
}

fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Per-field rules, checked in the order fields were added.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    fields: Vec<(String, Vec<Rule>)>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for `name`, appending to any it already has.
    pub fn field(mut self, name: &str, rules: impl IntoIterator<Item = Rule>) -> Self {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((name.to_string(), rules.into_iter().collect())),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check `input`, collecting every failing message per field.
    pub fn check(&self, input: &AttributeMap) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (name, rules) in &self.fields {
            let value = input.get(name);
            let label = name.replace('_', " ");
            for rule in rules {
                if !rule.is_implicit() && !is_filled(value) {
                    continue;
                }
                if let Some(message) = rule.check(&label, value) {
                    errors.add(name, message);
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field name → failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<ValidationErrors> for ErrorPayload {
    fn from(errors: ValidationErrors) -> Self {
        ErrorPayload::Message(errors.to_value())
    }
}

//! Reference classifier. Decides whether a raw change value is a literal or
//! names another property, and turns literals into typed values.
//!
//! References use a sentinel scheme: a single leading sentinel character
//! (`&` unless configured otherwise) followed by a dotted key path. Anything
//! that does not match exactly is a literal; classification never fails.

use crate::model::{PATH_SEPARATOR, Value};

/// Default sentinel marking a reference value.
pub const DEFAULT_SENTINEL: char = '&';

/// Outcome of classifying a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    Literal(&'a str),
    Reference(&'a str),
}

impl<'a> Classified<'a> {
    pub fn reference(self) -> Option<&'a str> {
        match self {
            Classified::Reference(key) => Some(key),
            Classified::Literal(_) => None,
        }
    }
}

/// Classify `raw` using the given sentinel.
pub fn classify(raw: &str, sentinel: char) -> Classified<'_> {
    match raw.strip_prefix(sentinel) {
        Some(key) if is_key_path(key, sentinel) => Classified::Reference(key),
        _ => Classified::Literal(raw),
    }
}

/// A well-formed key path: non-empty segments, no whitespace, no second sentinel.
fn is_key_path(key: &str, sentinel: char) -> bool {
    !key.is_empty()
        && !key.chars().any(char::is_whitespace)
        && key.split(PATH_SEPARATOR).all(|segment| !segment.is_empty())
        && !key.starts_with(sentinel)
}

// ============================================================================
// Literal casting
// ============================================================================

/// Convert a literal to a value, shaped by the property's current value.
///
/// A string property keeps the literal as text, so `OVERRIDE "1"` on a string
/// stores `"1"` rather than the integer 1. Returns `None` when the literal
/// cannot take the shape the current value demands (e.g. non-numeric text
/// against a number).
pub fn cast_literal(raw: &str, current: &Value) -> Option<Value> {
    match current {
        Value::Int(_) | Value::Float(_) => parse_number(raw.trim()),
        Value::String(_) => Some(Value::String(raw.to_string())),
        Value::Bool(_) => match raw.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            other => Some(parse_generic(other)),
        },
        Value::Null | Value::List(_) | Value::Map(_) => Some(parse_generic(raw)),
    }
}

/// Shape a value read through a reference the way a literal would be shaped.
///
/// Text read into a numeric property must parse as a number, and scalars read
/// into a string property become their text form. Null and containers pass
/// through unchanged.
pub fn cast_value(resolved: Value, current: &Value) -> Option<Value> {
    match (current, resolved) {
        (_, Value::Null) => Some(Value::Null),
        (Value::Int(_) | Value::Float(_), v @ (Value::Int(_) | Value::Float(_))) => Some(v),
        (Value::Int(_) | Value::Float(_), Value::String(s)) => parse_number(s.trim()),
        (Value::Int(_) | Value::Float(_), _) => None,
        (Value::String(_), v @ (Value::List(_) | Value::Map(_))) => Some(v),
        (Value::String(_), v) => Some(Value::String(v.to_text())),
        (Value::Bool(_), Value::String(s)) => cast_literal(&s, current),
        (_, v) => Some(v),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Int(i));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

/// JSON when the text is valid JSON, otherwise the text itself.
fn parse_generic(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw.trim())
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

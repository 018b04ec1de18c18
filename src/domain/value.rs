// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Values
//!
//! Attributes are JSON values held in insertion-ordered maps, so enumeration
//! order is deterministic and matches the order data was declared in.

use serde_json::Value;

/// Attribute name → value mapping
pub type Data = serde_json::Map<String, Value>;

/// Whether a value counts as "found" during group lookups.
///
/// `null`, `false`, numeric zero, and empty strings, arrays and objects are
/// falsy. Everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short JSON type name used in error messages
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value as plain text; strings are not quoted
pub fn as_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Interpret a value as a TCP port
///
/// Integers and numeric strings in `0..=65535` are ports; anything else is
/// not. `"<name>_options"` blocks apply the same rule.
pub fn as_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a `groups` field into a list of group names
pub(crate) fn group_names(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(format!(
                    "group references must be strings, got {}",
                    kind(other)
                )),
            })
            .collect(),
        other => Err(format!("'groups' must be a list, got {}", kind(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(null), false; "null")]
    #[test_case(json!(false), false; "false")]
    #[test_case(json!(true), true; "true")]
    #[test_case(json!(0), false; "zero")]
    #[test_case(json!(0.0), false; "float zero")]
    #[test_case(json!(-1), true; "negative")]
    #[test_case(json!(""), false; "empty string")]
    #[test_case(json!("bma"), true; "string")]
    #[test_case(json!([]), false; "empty array")]
    #[test_case(json!([0]), true; "array")]
    #[test_case(json!({}), false; "empty object")]
    #[test_case(json!({"a": 1}), true; "object")]
    fn test_truthiness(value: Value, expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[test_case(json!(22), Some(22); "number")]
    #[test_case(json!("830"), Some(830); "numeric string")]
    #[test_case(json!(70000), None; "out of range")]
    #[test_case(json!("ssh"), None; "non numeric")]
    #[test_case(json!(null), None; "null")]
    fn test_as_port(value: Value, expected: Option<u16>) {
        assert_eq!(as_port(&value), expected);
    }

    #[test]
    fn test_as_text_does_not_quote_strings() {
        assert_eq!(as_text(json!("r1.lab")), "r1.lab");
        assert_eq!(as_text(json!(42)), "42");
    }

    #[test]
    fn test_group_names() {
        assert_eq!(
            group_names(&json!(["core", "edge"])).unwrap(),
            vec!["core".to_string(), "edge".to_string()]
        );
        assert!(group_names(&json!(null)).unwrap().is_empty());
        assert!(group_names(&json!("core")).is_err());
        assert!(group_names(&json!(["core", 1])).is_err());
    }
}

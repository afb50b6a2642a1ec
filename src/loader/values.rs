//! Lenient reads from parsed YAML

use serde_yaml::Value;

/// Strings, numbers and booleans as text; anything else is absent.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A non-blank scalar field of a mapping
pub(crate) fn field_string(map: &Value, key: &str) -> Option<String> {
    map.get(key)
        .and_then(scalar_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A list of scalars, or a single scalar treated as a one-item list.
pub(crate) fn field_list(map: &Value, key: &str) -> Option<Vec<String>> {
    match map.get(key)? {
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(scalar_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Value::Null => None,
        other => scalar_string(other)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| vec![s]),
    }
}

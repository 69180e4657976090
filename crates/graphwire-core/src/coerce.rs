//! Primitive coercions applied uniformly by every normalizer.
//!
//! None of these ever fail. A value that does not fit is reported as `None`
//! so callers can move on to the next candidate field.

use serde_json::{Map, Value};

/// Accept only finite JSON numbers. Strings are never parsed.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    value?.as_f64().filter(|n| n.is_finite())
}

/// A non-negative count. Fractional values are truncated.
pub fn to_count(value: Option<&Value>) -> Option<u64> {
    to_number(value).filter(|n| *n >= 0.0).map(|n| n as u64)
}

/// Strings as-is, finite numbers stringified, everything else `None`.
pub fn to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            // Integers keep their exact representation, floats go through f64.
            if n.is_i64() || n.is_u64() {
                Some(n.to_string())
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

/// Non-null objects only.
pub fn to_record(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value?.as_object()
}

pub fn to_bool(value: Option<&Value>) -> Option<bool> {
    value?.as_bool()
}

/// Look up `key` on `value` if it is an object.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    to_record(Some(value))?.get(key)
}

/// Look up `outer.inner` where `outer` must be an object.
pub fn nested<'a>(value: &'a Value, outer: &str, inner: &str) -> Option<&'a Value> {
    field(value, outer).and_then(|section| field(section, inner))
}

/// First string-coercible value among `keys`, in order.
pub fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| to_string(field(value, key)))
}

/// First finite number among `keys`, in order.
pub fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| to_number(field(value, key)))
}

/// First count among `keys`, in order.
pub fn first_count(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| to_count(field(value, key)))
}

/// A tag list: accepts strings or `{name}` objects, keeps first occurrence order.
pub fn to_tag_names(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut names: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let name = to_string(Some(item)).or_else(|| first_string(item, &["name", "tag"]));
        if let Some(name) = name {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

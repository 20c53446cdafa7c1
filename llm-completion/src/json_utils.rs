//! Typed field access over decoded JSON objects.
//!
//! Required accessors fail with [`DecodeError::MissingField`] when the key is
//! absent and [`DecodeError::InvalidType`] when it holds anything else,
//! including `null`. Optional accessors treat an absent key and an explicit
//! `null` alike as `None`. No value is ever coerced from one JSON type to
//! another.

use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};

/// Look up a required key.
fn required<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    map.get(key).ok_or_else(|| DecodeError::missing_field(key))
}

/// Look up an optional key, folding `null` into `None`.
fn optional<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

pub(crate) fn required_str(map: &Map<String, Value>, key: &str) -> Result<String> {
    let value = required(map, key)?;
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| DecodeError::invalid_type(key, "string", value))
}

pub(crate) fn optional_str(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    optional(map, key)
        .map(|value| {
            value
                .as_str()
                .map(String::from)
                .ok_or_else(|| DecodeError::invalid_type(key, "string or null", value))
        })
        .transpose()
}

pub(crate) fn required_i64(map: &Map<String, Value>, key: &str) -> Result<i64> {
    let value = required(map, key)?;
    value
        .as_i64()
        .ok_or_else(|| DecodeError::invalid_type(key, "integer", value))
}

pub(crate) fn optional_i64(map: &Map<String, Value>, key: &str) -> Result<Option<i64>> {
    optional(map, key)
        .map(|value| {
            value
                .as_i64()
                .ok_or_else(|| DecodeError::invalid_type(key, "integer or null", value))
        })
        .transpose()
}

pub(crate) fn required_array<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    let value = required(map, key)?;
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| DecodeError::invalid_type(key, "array", value))
}

/// Borrow a nested object under an optional key.
pub(crate) fn optional_object<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    optional(map, key)
        .map(|value| {
            value
                .as_object()
                .ok_or_else(|| DecodeError::not_an_object(key, value))
        })
        .transpose()
}

/// Borrow a value as an object, reporting `field` on failure.
pub(crate) fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::not_an_object(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    #[test]
    fn test_required_str() {
        let map = object(json!({ "text": "hi", "n": 1, "none": null }));
        assert_eq!(required_str(&map, "text").unwrap(), "hi");
        assert!(matches!(
            required_str(&map, "missing"),
            Err(DecodeError::MissingField { .. })
        ));
        assert!(matches!(
            required_str(&map, "n"),
            Err(DecodeError::InvalidType { found: "number", .. })
        ));
        assert!(matches!(
            required_str(&map, "none"),
            Err(DecodeError::InvalidType { found: "null", .. })
        ));
    }

    #[test]
    fn test_optional_folds_null_and_absent() {
        let map = object(json!({ "a": null }));
        assert_eq!(optional_str(&map, "a").unwrap(), None);
        assert_eq!(optional_str(&map, "b").unwrap(), None);
        assert_eq!(optional_i64(&map, "a").unwrap(), None);
        assert_eq!(optional_i64(&map, "b").unwrap(), None);
        assert!(optional_object(&map, "a").unwrap().is_none());
    }

    #[test]
    fn test_i64_accepts_any_integer_without_range_check() {
        let map = object(json!({
            "neg": -1,
            "big": 5_000_000_000_u64,
            "max": i64::MAX,
        }));
        assert_eq!(required_i64(&map, "neg").unwrap(), -1);
        assert_eq!(required_i64(&map, "big").unwrap(), 5_000_000_000);
        assert_eq!(optional_i64(&map, "big").unwrap(), Some(5_000_000_000));
        assert_eq!(required_i64(&map, "max").unwrap(), i64::MAX);
    }

    #[test]
    fn test_i64_rejects_floats_and_strings() {
        let map = object(json!({ "float": 1.0, "text": "5" }));
        assert!(matches!(
            required_i64(&map, "float"),
            Err(DecodeError::InvalidType { found: "number", .. })
        ));
        assert!(optional_i64(&map, "float").is_err());
        assert!(matches!(
            required_i64(&map, "text"),
            Err(DecodeError::InvalidType { found: "string", .. })
        ));
    }

    #[test]
    fn test_required_array() {
        let map = object(json!({ "items": [1, 2], "obj": {} }));
        assert_eq!(required_array(&map, "items").unwrap().len(), 2);
        assert!(matches!(
            required_array(&map, "obj"),
            Err(DecodeError::InvalidType { expected: "array", found: "object", .. })
        ));
    }

    #[test]
    fn test_optional_object_rejects_scalars() {
        let map = object(json!({ "usage": "none" }));
        let err = optional_object(&map, "usage").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "string", .. }));
        assert_eq!(err.field(), Some("usage"));
    }
}

//! Token accounting attached to a completion response.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::choice::DisplayOpt;
use crate::error::{DecodeError, Result};
use crate::json_utils::{as_object, optional_i64};

/// Token usage reported by the API for one call.
///
/// Every count is optional. The counts are reported exactly as received:
/// `total_tokens` is not required to equal the sum of the other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Usage {
    prompt_tokens: Option<i64>,
    completion_tokens: Option<i64>,
    total_tokens: Option<i64>,
}

impl Usage {
    /// Create token usage with the given counts.
    #[must_use]
    pub const fn new(
        prompt_tokens: Option<i64>,
        completion_tokens: Option<i64>,
        total_tokens: Option<i64>,
    ) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    /// Decode usage from a JSON object with the keys `prompt_tokens`,
    /// `completion_tokens` and `total_tokens`, each of which may be absent or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidType`] if a present, non-null key is not
    /// an integer.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            prompt_tokens: optional_i64(map, "prompt_tokens")?,
            completion_tokens: optional_i64(map, "completion_tokens")?,
            total_tokens: optional_i64(map, "total_tokens")?,
        })
    }

    /// Decode usage from any JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] if `value` is not an object, or
    /// any error from [`Usage::from_map`].
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "")?)
    }

    /// Tokens consumed by the prompt.
    #[must_use]
    pub const fn prompt_tokens(&self) -> Option<i64> {
        self.prompt_tokens
    }

    /// Tokens generated in the completion.
    #[must_use]
    pub const fn completion_tokens(&self) -> Option<i64> {
        self.completion_tokens
    }

    /// Total tokens as reported by the API.
    #[must_use]
    pub const fn total_tokens(&self) -> Option<i64> {
        self.total_tokens
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Usage(promptTokens: {}, completionTokens: {}, totalTokens: {})",
            DisplayOpt(self.prompt_tokens),
            DisplayOpt(self.completion_tokens),
            DisplayOpt(self.total_tokens),
        )
    }
}

impl TryFrom<&Map<String, Value>> for Usage {
    type Error = DecodeError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        Self::from_map(map)
    }
}

impl TryFrom<Value> for Usage {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Usage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::hash::{DefaultHasher, Hash, Hasher};

    fn hash_of(usage: &Usage) -> u64 {
        let mut hasher = DefaultHasher::new();
        usage.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_usage_reads_snake_case_keys() {
        let usage = Usage::from_value(&json!({
            "prompt_tokens": 5,
            "completion_tokens": 7,
            "total_tokens": 12
        }))
        .unwrap();

        assert_eq!(usage.prompt_tokens(), Some(5));
        assert_eq!(usage.completion_tokens(), Some(7));
        assert_eq!(usage.total_tokens(), Some(12));
    }

    #[test]
    fn test_usage_ignores_camel_case_keys() {
        let usage = Usage::from_value(&json!({ "promptTokens": 5 })).unwrap();
        assert_eq!(usage, Usage::default());
    }

    #[test]
    fn test_usage_accepts_inconsistent_total() {
        let usage = Usage::from_value(&json!({
            "prompt_tokens": 5,
            "completion_tokens": 7,
            "total_tokens": 100
        }))
        .unwrap();
        assert_eq!(usage, Usage::new(Some(5), Some(7), Some(100)));
    }

    #[test]
    fn test_usage_all_absent() {
        let from_nulls = Usage::from_value(&json!({
            "prompt_tokens": null,
            "completion_tokens": null,
            "total_tokens": null
        }))
        .unwrap();
        let from_empty = Usage::from_value(&json!({})).unwrap();

        assert_eq!(from_nulls, Usage::new(None, None, None));
        assert_eq!(from_nulls, from_empty);
    }

    #[test]
    fn test_usage_absent_is_distinct_from_populated() {
        let partial = Usage::new(Some(10), None, None);
        let empty = Usage::new(None, None, None);
        assert_ne!(partial, empty);
        assert_ne!(Usage::new(Some(0), None, None), empty);
    }

    #[test]
    fn test_usage_keeps_negative_and_large_counts() {
        let usage = Usage::from_value(&json!({
            "prompt_tokens": -1,
            "completion_tokens": 0,
            "total_tokens": 5_000_000_000_u64
        }))
        .unwrap();
        assert_eq!(usage, Usage::new(Some(-1), Some(0), Some(5_000_000_000)));
    }

    #[test]
    fn test_usage_rejects_float_counts() {
        let err = Usage::from_value(&json!({ "prompt_tokens": 1.5 })).unwrap_err();
        assert_eq!(err.field(), Some("prompt_tokens"));
    }

    #[test]
    fn test_usage_rejects_wrong_type() {
        let err = Usage::from_value(&json!({ "total_tokens": "12" })).unwrap_err();
        assert!(matches!(
            &err,
            DecodeError::InvalidType { field, found: "string", .. } if field == "total_tokens"
        ));
    }

    #[test]
    fn test_usage_hash_consistent_with_eq() {
        let a = Usage::new(Some(1), Some(2), Some(3));
        let b = Usage::from_value(&json!({
            "prompt_tokens": 1,
            "completion_tokens": 2,
            "total_tokens": 3
        }))
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_usage_serializes_wire_names() {
        let usage = Usage::new(Some(5), None, Some(5));
        assert_eq!(
            serde_json::to_value(usage).unwrap(),
            json!({ "prompt_tokens": 5, "completion_tokens": null, "total_tokens": 5 })
        );
    }

    #[test]
    fn test_usage_display() {
        let usage = Usage::new(Some(10), None, None);
        assert_eq!(
            usage.to_string(),
            "Usage(promptTokens: 10, completionTokens: null, totalTokens: null)"
        );
    }
}

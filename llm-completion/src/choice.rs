//! A single generated candidate within a completion response.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};
use crate::json_utils::{as_object, optional_i64, optional_str, required_i64, required_str};

/// One candidate completion among those returned by a single call.
///
/// `index` is the zero-based position of this choice within its parent's
/// `choices` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Choice {
    text: String,
    index: i64,
    logprobs: Option<i64>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

impl Choice {
    /// Create a new choice.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        index: i64,
        logprobs: Option<i64>,
        finish_reason: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            index,
            logprobs,
            finish_reason,
        }
    }

    /// Decode a choice from a JSON object.
    ///
    /// Reads `text`, `index`, `logprobs` and `finishReason`. The latter two
    /// may be absent or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingField`] if `text` or `index` is absent and
    /// [`DecodeError::InvalidType`] if any key holds a value of the wrong type.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            text: required_str(map, "text")?,
            index: required_i64(map, "index")?,
            logprobs: optional_i64(map, "logprobs")?,
            finish_reason: optional_str(map, "finishReason")?,
        })
    }

    /// Decode a choice from any JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] if `value` is not an object, or
    /// any error from [`Choice::from_map`].
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "")?)
    }

    /// The generated text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based position within the parent response.
    #[must_use]
    pub const fn index(&self) -> i64 {
        self.index
    }

    /// Log-probability summary, when requested.
    #[must_use]
    pub const fn logprobs(&self) -> Option<i64> {
        self.logprobs
    }

    /// Why generation stopped, e.g. `"stop"` or `"length"`.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Choice(text: {:?}, index: {}, logprobs: {}, finishReason: {})",
            self.text,
            self.index,
            DisplayOpt(self.logprobs.as_ref()),
            DisplayOpt(self.finish_reason.as_ref()),
        )
    }
}

impl TryFrom<&Map<String, Value>> for Choice {
    type Error = DecodeError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        Self::from_map(map)
    }
}

impl TryFrom<Value> for Choice {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Renders `None` as `null` and `Some(v)` as `v`.
pub(crate) struct DisplayOpt<T>(pub(crate) Option<T>);

impl<T: fmt::Display> fmt::Display for DisplayOpt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str("null"),
        }
    }
}

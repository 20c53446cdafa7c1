//! The top-level completion response.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::choice::Choice;
use crate::error::{DecodeError, Result};
use crate::json_utils::{as_object, optional_object, required_array, required_i64, required_str};
use crate::usage::Usage;

/// A text completion returned by the API.
///
/// Equality and hashing consider `id`, `created`, `model` and `choices`
/// (element-wise, in order). `usage` is carried but ignored by both, so two
/// responses that differ only in their reported token counts compare equal.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    created: DateTime<Utc>,
    model: String,
    choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<Usage>,
}

impl CompletionResponse {
    /// Create a new completion response.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        created: DateTime<Utc>,
        model: impl Into<String>,
        choices: Vec<Choice>,
        usage: Option<Usage>,
    ) -> Self {
        Self {
            id: id.into(),
            created,
            model: model.into(),
            choices,
            usage,
        }
    }

    /// Decode a response from a JSON object.
    ///
    /// `created` is read as integer epoch seconds. Each element of `choices`
    /// is decoded with [`Choice::from_map`]; `usage` is decoded with
    /// [`Usage::from_map`] when present and non-null.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] naming the first field, by path, that is
    /// absent or has the wrong shape. No partial response is produced.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let result = Self::decode(map);
        match &result {
            Ok(response) => trace!(
                id = %response.id,
                model = %response.model,
                choices = response.choices.len(),
                "Decoded completion response"
            ),
            Err(error) => debug!(%error, "Failed to decode completion response"),
        }
        result
    }

    fn decode(map: &Map<String, Value>) -> Result<Self> {
        let id = required_str(map, "id")?;
        let created = decode_created(map)?;
        let model = required_str(map, "model")?;

        let choices = required_array(map, "choices")?
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let path = format!("choices[{i}]");
                as_object(value, "")
                    .and_then(Choice::from_map)
                    .map_err(|e| e.within(&path))
            })
            .collect::<Result<Vec<_>>>()?;

        let usage = optional_object(map, "usage")?
            .map(|usage| Usage::from_map(usage).map_err(|e| e.within("usage")))
            .transpose()?;

        Ok(Self {
            id,
            created,
            model,
            choices,
            usage,
        })
    }

    /// Decode a response from any JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] if `value` is not an object, or
    /// any error from [`CompletionResponse::from_map`].
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "")?)
    }

    /// Parse and decode a response from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if `json` is not valid JSON, or any error
    /// from [`CompletionResponse::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse and decode a response from a JSON byte buffer.
    ///
    /// # Errors
    ///
    /// Same as [`CompletionResponse::from_json`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Opaque identifier of this completion.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the completion was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Name of the model that produced the completion.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generated candidates, ordered by their `index`.
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Token usage, if the API reported it.
    #[must_use]
    pub const fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    /// Check if the response contains at least one choice.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// The first choice, if any.
    #[must_use]
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    /// Text of the first choice, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.first_choice().map(Choice::text)
    }
}

fn decode_created(map: &Map<String, Value>) -> Result<DateTime<Utc>> {
    let secs = required_i64(map, "created")?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DecodeError::InvalidType {
        field: "created".into(),
        expected: "epoch seconds in range",
        found: "number",
    })
}

impl PartialEq for CompletionResponse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.created == other.created
            && self.model == other.model
            && self.choices == other.choices
    }
}

impl Eq for CompletionResponse {}

impl Hash for CompletionResponse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.created.hash(state);
        self.model.hash(state);
        self.choices.hash(state);
    }
}

impl fmt::Display for CompletionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompletionResponse(id: {}, created: {}, model: {}, choices: [",
            self.id,
            self.created.to_rfc3339(),
            self.model
        )?;
        for (i, choice) in self.choices.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{choice}")?;
        }
        f.write_str("])")
    }
}

impl TryFrom<&Map<String, Value>> for CompletionResponse {
    type Error = DecodeError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        Self::from_map(map)
    }
}

impl TryFrom<Value> for CompletionResponse {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl std::str::FromStr for CompletionResponse {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl<'de> Deserialize<'de> for CompletionResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

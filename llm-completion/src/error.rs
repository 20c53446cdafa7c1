//! Error types for decoding completion responses.
//!
//! Every decoding factory in this crate returns [`Result`], whose error
//! names the field that did not have the expected shape. Field names are
//! dotted paths rooted at the outermost document being decoded, such as
//! `choices[1].text` or `usage.total_tokens`.

use serde_json::Value;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a completion response.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A required key was absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Path of the missing field.
        field: String,
    },

    /// A key was present but held a value of the wrong type.
    #[error("invalid type for field `{field}`: expected {expected}, found {found}")]
    InvalidType {
        /// Path of the offending field.
        field: String,
        /// Description of the expected type.
        expected: &'static str,
        /// Description of the value actually found.
        found: &'static str,
    },

    /// A value that must be a JSON object was something else.
    #[error("expected a JSON object at `{}`, found {found}", display_path(.field))]
    NotAnObject {
        /// Path of the offending value. Empty for the document root.
        field: String,
        /// Description of the value actually found.
        found: &'static str,
    },

    /// The input was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid type error, describing `found` from the offending value.
    #[must_use]
    pub fn invalid_type(field: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
            found: describe(found),
        }
    }

    /// Create a not-an-object error for the given value.
    #[must_use]
    pub fn not_an_object(field: impl Into<String>, found: &Value) -> Self {
        Self::NotAnObject {
            field: field.into(),
            found: describe(found),
        }
    }

    /// Path of the field that failed to decode, if the error refers to one.
    ///
    /// Errors about the document root itself have no field.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::NotAnObject { field, .. } => Some(field.as_str()).filter(|f| !f.is_empty()),
            Self::Json(_) => None,
        }
    }

    /// Whether this error is a shape mismatch, i.e. an absent or wrongly typed field.
    ///
    /// Only malformed JSON text is not a shape mismatch.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        !matches!(self, Self::Json(_))
    }

    /// Prefix the field path with the location of the enclosing value.
    ///
    /// Used by outer factories so that an error raised while decoding a
    /// nested object reports its full path.
    #[must_use]
    pub(crate) fn within(self, parent: &str) -> Self {
        let join = |field: String| {
            if field.is_empty() {
                parent.to_string()
            } else {
                format!("{parent}.{field}")
            }
        };
        match self {
            Self::MissingField { field } => Self::MissingField { field: join(field) },
            Self::InvalidType {
                field,
                expected,
                found,
            } => Self::InvalidType {
                field: join(field),
                expected,
                found,
            },
            Self::NotAnObject { field, found } => Self::NotAnObject {
                field: join(field),
                found,
            },
            err @ Self::Json(_) => err,
        }
    }
}

/// Name the document root explicitly instead of printing an empty path.
fn display_path(field: &str) -> &str {
    if field.is_empty() { "<root>" } else { field }
}

/// Short name of a JSON value's type, for error messages.
const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

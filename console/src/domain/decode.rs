//! Typed decoding of API payloads.
//!
//! A list endpoint that answers with something other than an array yields
//! [`DecodeError::NotAnArray`], distinct from element failures, so callers
//! can choose an explicit default instead of silently coercing.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Failures raised while decoding a successful API payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload was not a JSON array.
    #[error("expected a JSON array but received {found}")]
    NotAnArray {
        /// JSON type that was received instead.
        found: &'static str,
    },
    /// One array element did not match the record shape.
    #[error("record {index} could not be decoded: {message}")]
    Element {
        /// Zero-based position in the array.
        index: usize,
        /// Decoder message.
        message: String,
    },
    /// A single-object payload did not match the record shape.
    #[error("response could not be decoded: {message}")]
    Object {
        /// Decoder message.
        message: String,
    },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a list payload into typed records.
///
/// # Errors
///
/// Returns [`DecodeError::NotAnArray`] for non-array payloads and
/// [`DecodeError::Element`] for the first malformed element.
pub fn decode_list<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>, DecodeError> {
    let Value::Array(items) = payload else {
        return Err(DecodeError::NotAnArray {
            found: json_type(&payload),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| DecodeError::Element {
                index,
                message: err.to_string(),
            })
        })
        .collect()
}

/// Decode a single-object payload.
///
/// # Errors
///
/// Returns [`DecodeError::Object`] when the payload does not match `T`.
pub fn decode_object<T: DeserializeOwned>(payload: Value) -> Result<T, DecodeError> {
    serde_json::from_value(payload).map_err(|err| DecodeError::Object {
        message: err.to_string(),
    })
}

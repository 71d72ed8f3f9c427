//! DTO for decoding error bodies returned by the studio API.
//!
//! The human-readable message is taken from `error`, then `details`, then
//! `message`, skipping blank values.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ApiErrorBodyDto {
    #[serde(default)]
    pub(super) error: Option<Value>,
    #[serde(default)]
    pub(super) details: Option<Value>,
    #[serde(default)]
    pub(super) message: Option<Value>,
}

impl ApiErrorBodyDto {
    pub(super) fn into_message(self) -> Option<String> {
        [self.error, self.details, self.message]
            .into_iter()
            .flatten()
            .find_map(value_text)
    }
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Array(items) => {
            let parts = items.into_iter().filter_map(value_text).collect::<Vec<_>>();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(mut fields) => fields.remove("message").and_then(value_text),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

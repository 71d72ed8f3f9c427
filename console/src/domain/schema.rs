//! Field schemas, form drafts, validation, and sparse JSON serialisation.
//!
//! A [`Draft`] holds raw operator input keyed by field name. The owning
//! resource's [`FieldSchema`] decides which fields are required, how each raw
//! string parses, and which empty fields are omitted or sent as `null`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;
use serde_json::{Map, Number, Value};

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Draft seeded empty; submitted with `POST`.
    Create,
    /// Draft seeded from a record; submitted with `PATCH`.
    Edit,
}

/// How a field's raw input is parsed and serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, sent as a JSON string.
    Text,
    /// Email address, sent as a JSON string.
    Email,
    /// Decimal number (prices, discounts), sent as a JSON number.
    Decimal,
    /// Whole number (counts, minutes), sent as a JSON number.
    Integer,
    /// `true`/`false` toggle.
    Boolean,
    /// One of a fixed set of enumerated values.
    Choice(&'static [&'static str]),
    /// RFC 3339 timestamp, sent as a JSON string.
    DateTime,
}

impl FieldKind {
    fn expectation(self) -> String {
        match self {
            Self::Text => "text".to_owned(),
            Self::Email => "a valid email address".to_owned(),
            Self::Decimal => "a number".to_owned(),
            Self::Integer => "a whole number".to_owned(),
            Self::Boolean => "true or false".to_owned(),
            Self::Choice(options) => format!("one of {}", options.join(", ")),
            Self::DateTime => "an RFC 3339 timestamp".to_owned(),
        }
    }
}

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key.
    pub name: &'static str,
    /// Label shown to the operator and used in validation messages.
    pub label: &'static str,
    /// Parsing rule.
    pub kind: FieldKind,
    /// Must be non-empty before submission.
    pub required: bool,
    /// An edit that empties this field sends `null` instead of omitting it.
    pub clearable: bool,
}

impl FieldSpec {
    /// Optional field of `kind`.
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            clearable: false,
        }
    }

    /// Mark the field required.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Allow edits to clear the field.
    pub const fn clearable(self) -> Self {
        Self {
            clearable: true,
            ..self
        }
    }
}

/// Ordered list of editable fields for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

/// Validation failure reported inline, before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    Missing {
        /// Field JSON key.
        field: &'static str,
        /// Field label.
        label: &'static str,
    },
    /// A field did not parse as its kind.
    Invalid {
        /// Field JSON key.
        field: &'static str,
        /// Field label.
        label: &'static str,
        /// What the field expects.
        expected: String,
    },
    /// The draft referenced a field the schema does not define.
    UnknownField {
        /// Offending key.
        field: String,
    },
    /// A resource-specific rule failed.
    Rule {
        /// Field the rule is attached to.
        field: &'static str,
        /// Operator-facing explanation.
        message: String,
    },
}

impl ValidationError {
    /// Resource-specific rule violation.
    pub fn rule(field: &'static str, message: impl Into<String>) -> Self {
        Self::Rule {
            field,
            message: message.into(),
        }
    }

    /// Field the error is attached to.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field, .. } | Self::Invalid { field, .. } | Self::Rule { field, .. } => {
                field
            }
            Self::UnknownField { field } => field.as_str(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { label, .. } => write!(f, "{label} is required"),
            Self::Invalid {
                label, expected, ..
            } => write!(f, "{label} must be {expected}"),
            Self::UnknownField { field } => write!(f, "unknown field `{field}`"),
            Self::Rule { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Raw operator input keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<String, String>,
}

impl Draft {
    /// Empty draft for create forms.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style setter for a present value.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl ToString) -> Self {
        self.values.insert(field.to_owned(), value.to_string());
        self
    }

    /// Builder-style setter where `None` seeds an empty string.
    #[must_use]
    pub fn with_opt<T: ToString>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(field, value),
            None => self.with(field, ""),
        }
    }

    /// Replace one field's raw input.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_owned(), value.into());
    }

    /// Raw input for `field`, trimmed; empty when unset.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map_or("", |value| value.trim())
    }

    /// Field names present in the draft.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Parse a boolean toggle as typed by an operator.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn is_email(raw: &str) -> bool {
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !raw.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl FieldSchema {
    /// Build a schema from fields in form order.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Fields in form order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by JSON key.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Check required fields and parseability without building a body.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, in schema order.
    pub fn validate(&self, draft: &Draft) -> Result<(), ValidationError> {
        self.check(draft, None)
    }

    /// `unset_in_record` waives `required` for fields it holds empty: an
    /// edit may leave a value the server never returned unset.
    fn check(&self, draft: &Draft, unset_in_record: Option<&Draft>) -> Result<(), ValidationError> {
        if let Some(unknown) = draft.keys().find(|key| self.field(key).is_none()) {
            return Err(ValidationError::UnknownField {
                field: unknown.to_owned(),
            });
        }
        for spec in &self.fields {
            let raw = draft.get(spec.name);
            if raw.is_empty() {
                let waived = unset_in_record.is_some_and(|seed| seed.get(spec.name).is_empty());
                if spec.required && !waived {
                    return Err(ValidationError::Missing {
                        field: spec.name,
                        label: spec.label,
                    });
                }
                continue;
            }
            typed_value(spec, raw)?;
        }
        Ok(())
    }

    /// Serialise a validated draft into a sparse JSON object.
    ///
    /// Empty optional fields are omitted. In edit mode, a clearable field that
    /// was non-empty in `seed` and is now empty is sent as `null`, and a
    /// required field that was already empty in `seed` may stay empty.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`FieldSchema::validate`].
    pub fn to_body(
        &self,
        draft: &Draft,
        mode: FormMode,
        seed: Option<&Draft>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let unset_in_record = seed.filter(|_| mode == FormMode::Edit);
        self.check(draft, unset_in_record)?;
        let mut body = Map::new();
        for spec in &self.fields {
            let raw = draft.get(spec.name);
            if raw.is_empty() {
                let was_set = seed.is_some_and(|seed| !seed.get(spec.name).is_empty());
                if mode == FormMode::Edit && spec.clearable && was_set {
                    body.insert(spec.name.to_owned(), Value::Null);
                }
                continue;
            }
            body.insert(spec.name.to_owned(), typed_value(spec, raw)?);
        }
        Ok(body)
    }
}

fn invalid(spec: &FieldSpec) -> ValidationError {
    ValidationError::Invalid {
        field: spec.name,
        label: spec.label,
        expected: spec.kind.expectation(),
    }
}

fn typed_value(spec: &FieldSpec, raw: &str) -> Result<Value, ValidationError> {
    match spec.kind {
        FieldKind::Text => Ok(Value::String(raw.to_owned())),
        FieldKind::Email if is_email(raw) => Ok(Value::String(raw.to_owned())),
        FieldKind::Email => Err(invalid(spec)),
        FieldKind::Decimal => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(spec)),
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(|value| Value::Number(value.into()))
            .map_err(|_| invalid(spec)),
        FieldKind::Boolean => parse_bool(raw).map(Value::Bool).ok_or_else(|| invalid(spec)),
        FieldKind::Choice(options) => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(raw))
            .map(|option| Value::String((*option).to_owned()))
            .ok_or_else(|| invalid(spec)),
        FieldKind::DateTime => DateTime::parse_from_rfc3339(raw)
            .map(|_| Value::String(raw.to_owned()))
            .map_err(|_| invalid(spec)),
    }
}

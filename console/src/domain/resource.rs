//! Resource identity, API paths, and the trait every managed resource
//! implements.
//!
//! A [`Resource`] bundles what used to be spread across one admin page: the
//! endpoint, the editable field schema, how a record seeds an edit form, how a
//! row is displayed, and any resource-specific validation rule.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::display::DisplayOptions;
use crate::domain::schema::{Draft, FieldSchema, FormMode, ValidationError};
use crate::domain::Error;

/// Validation errors returned by [`ResourceId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdValidationError {
    /// Identifier was blank.
    Empty,
    /// Identifier contained a path separator, query marker, or whitespace.
    InvalidCharacters,
}

impl fmt::Display for ResourceIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::InvalidCharacters => write!(
                f,
                "identifier must not contain '/', '?', '#', or whitespace"
            ),
        }
    }
}

impl std::error::Error for ResourceIdValidationError {}

/// Server-assigned record identifier.
///
/// ## Invariants
/// - Non-empty and safe to embed as a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

/// Identifiers arrive as strings from most endpoints and as integers from a
/// few legacy ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl ResourceId {
    /// Validate and construct an identifier from trimmed input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ResourceIdValidationError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(ResourceIdValidationError::Empty);
        }
        if raw
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(ResourceIdValidationError::InvalidCharacters);
        }
        Ok(Self(raw.to_owned()))
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ResourceId> for String {
    fn from(value: ResourceId) -> Self {
        value.0
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match IdRepr::deserialize(deserializer)? {
            IdRepr::Text(text) => text,
            IdRepr::Number(number) => number.to_string(),
        };
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Absolute API path such as `/api/locations/12/layouts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath(String);

impl ApiPath {
    /// The `/api` root.
    pub fn api() -> Self {
        Self("/api".to_owned())
    }

    /// Append one or more static segments (may contain `/`).
    pub fn join(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0, segment.trim_matches('/')))
    }

    /// Append an identifier segment.
    pub fn join_id(&self, id: &ResourceId) -> Self {
        self.join(id.as_ref())
    }

    /// Path text, always starting with `/`.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an endpoint serves a list of records or a single settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    /// `GET` returns a JSON array.
    List,
    /// `GET` returns one JSON object that is edited in place.
    Singleton,
}

/// A backend-owned entity type managed through the console.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular human name, e.g. `package`.
    const NAME: &'static str;
    /// Collection segment below `/api` (or below the parent member path).
    const COLLECTION: &'static str;
    /// Parent collection for nested resources, e.g. `locations`.
    const PARENT: Option<&'static str> = None;
    /// Shape of the collection endpoint.
    const SHAPE: CollectionShape = CollectionShape::List;

    /// Record identifier.
    fn id(&self) -> &ResourceId;

    /// Short label naming the record in confirmations and notifications.
    fn label(&self) -> String;

    /// Editable fields in form order.
    fn schema() -> FieldSchema;

    /// Seed an edit draft from the record.
    fn to_draft(&self) -> Draft;

    /// Table column headings.
    fn columns() -> &'static [&'static str];

    /// Table cells for this record, aligned with [`Resource::columns`].
    fn row(&self, display: &DisplayOptions) -> Vec<String>;

    /// Resource-specific rule applied after schema validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate(_draft: &Draft, _mode: FormMode) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Collection path, resolving the parent segment for nested resources.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when a nested resource is addressed without
    /// its parent identifier.
    fn collection_path(parent: Option<&ResourceId>) -> Result<ApiPath, Error> {
        match (Self::PARENT, parent) {
            (None, _) => Ok(ApiPath::api().join(Self::COLLECTION)),
            (Some(parent_collection), Some(parent_id)) => Ok(ApiPath::api()
                .join(parent_collection)
                .join_id(parent_id)
                .join(Self::COLLECTION)),
            (Some(parent_collection), None) => Err(Error::invalid_request(format!(
                "{} records require a parent {parent_collection} id",
                Self::NAME
            ))),
        }
    }

    /// Member path used for `PATCH`, `DELETE`, and member actions.
    ///
    /// # Errors
    ///
    /// Propagates [`Resource::collection_path`] failures.
    fn member_path(id: &ResourceId, parent: Option<&ResourceId>) -> Result<ApiPath, Error> {
        let collection = Self::collection_path(parent)?;
        Ok(match Self::SHAPE {
            CollectionShape::List => collection.join_id(id),
            CollectionShape::Singleton => collection,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identifiers and paths.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", ResourceIdValidationError::Empty)]
    #[case("   ", ResourceIdValidationError::Empty)]
    #[case("a/b", ResourceIdValidationError::InvalidCharacters)]
    #[case("a b", ResourceIdValidationError::InvalidCharacters)]
    #[case("a?b", ResourceIdValidationError::InvalidCharacters)]
    fn rejects_unsafe_identifiers(#[case] raw: &str, #[case] expected: ResourceIdValidationError) {
        assert_eq!(ResourceId::new(raw).expect_err("must fail"), expected);
    }

    #[rstest]
    #[case(" pkg-1 ", "pkg-1")]
    #[case("\tloc-2\n", "loc-2")]
    #[case("42", "42")]
    fn surrounding_whitespace_is_trimmed(#[case] raw: &str, #[case] expected: &str) {
        let id = ResourceId::new(raw).expect("valid id");
        assert_eq!(id.as_ref(), expected);
    }

    #[rstest]
    fn numeric_identifiers_deserialize_as_text() {
        let id: ResourceId = serde_json::from_str("42").expect("numeric id");
        assert_eq!(id.as_ref(), "42");
        let id: ResourceId = serde_json::from_str("\"pkg_1\"").expect("string id");
        assert_eq!(id.as_ref(), "pkg_1");
    }

    #[rstest]
    fn blank_identifier_fails_to_deserialize() {
        assert!(serde_json::from_str::<ResourceId>("\"\"").is_err());
    }

    #[rstest]
    fn joins_nested_paths() {
        let parent = ResourceId::new("loc-1").expect("valid id");
        let path = ApiPath::api()
            .join("locations")
            .join_id(&parent)
            .join("/layouts/");
        assert_eq!(path.as_str(), "/api/locations/loc-1/layouts");
    }
}

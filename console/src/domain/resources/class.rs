//! Class templates that scheduled sessions are created from.

use serde::Deserialize;

use crate::domain::display::{DisplayOptions, or_dash, yes_no};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

/// Class record from `/api/classes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassRecord {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub instructor_id: Option<ResourceId>,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for ClassRecord {
    const NAME: &'static str = "class";
    const COLLECTION: &'static str = "classes";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("description", "Description", FieldKind::Text).clearable(),
            FieldSpec::new("duration_minutes", "Duration (minutes)", FieldKind::Integer)
                .clearable(),
            FieldSpec::new("capacity", "Capacity", FieldKind::Integer).clearable(),
            FieldSpec::new("instructor_id", "Instructor", FieldKind::Text).clearable(),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("name", &self.name)
            .with_opt("description", self.description.as_deref())
            .with_opt("duration_minutes", self.duration_minutes)
            .with_opt("capacity", self.capacity)
            .with_opt("instructor_id", self.instructor_id.as_ref())
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Minutes", "Capacity", "Instructor", "Active"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.duration_minutes),
            or_dash(self.capacity),
            or_dash(self.instructor_id.as_ref()),
            yes_no(self.is_active),
        ]
    }
}

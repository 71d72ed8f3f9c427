//! Studio locations, their seat layouts, and the seats within a layout.
//!
//! Layouts are nested under a location (`/api/locations/{id}/layouts`) and
//! seats under a layout (`/api/layouts/{id}/seats`).

use serde::Deserialize;

use crate::domain::display::{DisplayOptions, or_dash, yes_no};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const SEAT_TYPES: &[&str] = &["STANDARD", "PREMIUM", "ACCESSIBLE", "INSTRUCTOR"];

/// Location record from `/api/locations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

impl Resource for Location {
    const NAME: &'static str = "location";
    const COLLECTION: &'static str = "locations";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("address", "Address", FieldKind::Text).clearable(),
            FieldSpec::new("capacity", "Capacity", FieldKind::Integer).clearable(),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("name", &self.name)
            .with_opt("address", self.address.as_deref())
            .with_opt("capacity", self.capacity)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Address", "Capacity"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.address.as_deref()),
            or_dash(self.capacity),
        ]
    }
}

/// Seat layout record from `/api/locations/{id}/layouts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeatLayout {
    pub id: ResourceId,
    pub name: String,
    pub rows: i64,
    pub columns: i64,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for SeatLayout {
    const NAME: &'static str = "layout";
    const COLLECTION: &'static str = "layouts";
    const PARENT: Option<&'static str> = Some("locations");

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!("layout {}", self.name)
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("rows", "Rows", FieldKind::Integer).required(),
            FieldSpec::new("columns", "Columns", FieldKind::Integer).required(),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("name", &self.name)
            .with("rows", self.rows)
            .with("columns", self.columns)
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Grid", "Active"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            format!("{}x{}", self.rows, self.columns),
            yes_no(self.is_active),
        ]
    }
}

/// Seat record from `/api/layouts/{id}/seats`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Seat {
    pub id: ResourceId,
    pub label: String,
    pub row: i64,
    pub column: i64,
    #[serde(default)]
    pub seat_type: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for Seat {
    const NAME: &'static str = "seat";
    const COLLECTION: &'static str = "seats";
    const PARENT: Option<&'static str> = Some("layouts");

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!("seat {}", self.label)
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("label", "Label", FieldKind::Text).required(),
            FieldSpec::new("row", "Row", FieldKind::Integer).required(),
            FieldSpec::new("column", "Column", FieldKind::Integer).required(),
            FieldSpec::new("seat_type", "Seat type", FieldKind::Choice(SEAT_TYPES)),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("label", &self.label)
            .with("row", self.row)
            .with("column", self.column)
            .with_opt("seat_type", self.seat_type.as_deref())
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Label", "Row", "Column", "Type", "Active"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.label.clone(),
            self.row.to_string(),
            self.column.to_string(),
            or_dash(self.seat_type.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn id(raw: &str) -> ResourceId {
        ResourceId::new(raw).expect("valid id")
    }

    #[rstest]
    fn layouts_nest_under_locations() {
        let path = SeatLayout::collection_path(Some(&id("loc-1"))).expect("path");
        assert_eq!(path.as_str(), "/api/locations/loc-1/layouts");
        let member = SeatLayout::member_path(&id("lay-2"), Some(&id("loc-1"))).expect("path");
        assert_eq!(member.as_str(), "/api/locations/loc-1/layouts/lay-2");
    }

    #[rstest]
    fn seats_nest_under_layouts() {
        let path = Seat::collection_path(Some(&id("lay-2"))).expect("path");
        assert_eq!(path.as_str(), "/api/layouts/lay-2/seats");
    }

    #[rstest]
    fn nested_resources_require_a_parent() {
        let err = Seat::collection_path(None).expect_err("parent required");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}

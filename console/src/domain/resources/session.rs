//! Scheduled class sessions.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ClassSummary, name_cell};
use crate::domain::display::{DisplayOptions, format_datetime, or_dash, status_badge};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const SESSION_STATUSES: &[&str] = &["SCHEDULED", "CANCELLED", "COMPLETED"];

/// Session record from `/api/sessions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassSession {
    pub id: ResourceId,
    #[serde(default)]
    pub class_id: Option<ResourceId>,
    #[serde(default)]
    pub instructor_id: Option<ResourceId>,
    #[serde(default)]
    pub location_id: Option<ResourceId>,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub booked_count: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub class: Option<ClassSummary>,
}

impl ClassSession {
    fn class_name(&self) -> Option<&str> {
        self.class.as_ref().and_then(|class| class.name.as_deref())
    }
}

impl Resource for ClassSession {
    const NAME: &'static str = "session";
    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!(
            "{} at {}",
            name_cell(self.class_name()),
            format_datetime(&self.starts_at)
        )
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("class_id", "Class", FieldKind::Text).required(),
            FieldSpec::new("instructor_id", "Instructor", FieldKind::Text).clearable(),
            FieldSpec::new("location_id", "Location", FieldKind::Text).clearable(),
            FieldSpec::new("starts_at", "Starts at", FieldKind::DateTime).required(),
            FieldSpec::new("ends_at", "Ends at", FieldKind::DateTime).clearable(),
            FieldSpec::new("capacity", "Capacity", FieldKind::Integer).clearable(),
            FieldSpec::new("status", "Status", FieldKind::Choice(SESSION_STATUSES)),
        ])
    }

    fn to_draft(&self) -> Draft {
        let class_id = self
            .class_id
            .as_ref()
            .or_else(|| self.class.as_ref().and_then(|class| class.id.as_ref()));
        Draft::empty()
            .with_opt("class_id", class_id)
            .with_opt("instructor_id", self.instructor_id.as_ref())
            .with_opt("location_id", self.location_id.as_ref())
            .with("starts_at", self.starts_at.to_rfc3339())
            .with_opt("ends_at", self.ends_at.map(|at| at.to_rfc3339()))
            .with_opt("capacity", self.capacity)
            .with_opt("status", self.status.as_deref())
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Class", "Starts", "Ends", "Booked", "Status"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        let booked = match self.capacity {
            Some(capacity) => format!("{}/{capacity}", self.booked_count),
            None => self.booked_count.to_string(),
        };
        vec![
            self.id.to_string(),
            name_cell(self.class_name()),
            format_datetime(&self.starts_at),
            or_dash(self.ends_at.as_ref().map(format_datetime)),
            booked,
            or_dash(self.status.as_deref().map(status_badge)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::form::FormController;

    fn session(raw: serde_json::Value) -> ClassSession {
        serde_json::from_value(raw).expect("session")
    }

    #[rstest]
    fn unchanged_edit_of_an_open_ended_session_is_sent_as_fetched() {
        let record = session(json!({
            "id": "s1",
            "class_id": "c1",
            "instructor_id": "i1",
            "starts_at": "2026-03-01T09:00:00Z",
            "ends_at": null
        }));
        let mut form = FormController::<ClassSession>::default();
        form.open_edit(&record).expect("opens");

        let submission = form.begin_submit().expect("unchanged record is valid");
        assert_eq!(submission.body["class_id"], json!("c1"));
        assert_eq!(submission.body["instructor_id"], json!("i1"));
        assert_eq!(submission.body.get("ends_at"), None);
    }

    #[rstest]
    fn clearing_the_instructor_sends_null() {
        let record = session(json!({
            "id": "s1",
            "class_id": "c1",
            "instructor_id": "i1",
            "starts_at": "2026-03-01T09:00:00Z",
            "ends_at": "2026-03-01T09:45:00Z"
        }));
        let mut form = FormController::<ClassSession>::default();
        form.open_edit(&record).expect("opens");
        form.set_field("instructor_id", "").expect("set");

        let submission = form.begin_submit().expect("valid");
        assert_eq!(submission.body["instructor_id"], serde_json::Value::Null);
        assert_eq!(submission.body["ends_at"], json!("2026-03-01T09:45:00+00:00"));
    }
}

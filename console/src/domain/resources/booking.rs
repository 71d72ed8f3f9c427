//! Customer bookings of scheduled sessions.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ClassSummary, UserSummary, name_cell, user_cell};
use crate::domain::display::{DisplayOptions, format_datetime, or_dash, status_badge};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const BOOKING_STATUSES: &[&str] = &["CONFIRMED", "WAITLISTED", "CANCELLED", "ATTENDED", "NO_SHOW"];

/// Session reference embedded in a booking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookedSession {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub class: Option<ClassSummary>,
}

/// Booking record from `/api/bookings`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    pub id: ResourceId,
    pub status: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub session: Option<BookedSession>,
    #[serde(default)]
    pub seat_label: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    fn class_name(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|session| session.class.as_ref())
            .and_then(|class| class.name.as_deref())
    }
}

impl Resource for Booking {
    const NAME: &'static str = "booking";
    const COLLECTION: &'static str = "bookings";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!(
            "booking {} for {}",
            self.id,
            user_cell(self.user.as_ref())
        )
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("user_id", "User", FieldKind::Text).required(),
            FieldSpec::new("session_id", "Session", FieldKind::Text).required(),
            FieldSpec::new("status", "Status", FieldKind::Choice(BOOKING_STATUSES)).required(),
            FieldSpec::new("seat_label", "Seat", FieldKind::Text).clearable(),
        ])
    }

    fn to_draft(&self) -> Draft {
        let user_id = self.user.as_ref().and_then(|user| user.id.as_ref());
        let session_id = self.session.as_ref().and_then(|session| session.id.as_ref());
        Draft::empty()
            .with_opt("user_id", user_id)
            .with_opt("session_id", session_id)
            .with("status", &self.status)
            .with_opt("seat_label", self.seat_label.as_deref())
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Customer", "Class", "Starts", "Seat", "Status", "Booked"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        let starts_at = self.session.as_ref().and_then(|session| session.starts_at);
        vec![
            self.id.to_string(),
            user_cell(self.user.as_ref()),
            name_cell(self.class_name()),
            or_dash(starts_at.as_ref().map(format_datetime)),
            or_dash(self.seat_label.as_deref()),
            status_badge(&self.status),
            or_dash(self.created_at.as_ref().map(format_datetime)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::form::FormController;

    #[rstest]
    fn decodes_nested_session_class() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 7,
            "status": "CONFIRMED",
            "user": {"id": "u1", "first_name": "Ana", "last_name": "Ruiz"},
            "session": {
                "id": "s1",
                "starts_at": "2026-05-04T18:00:00Z",
                "class": {"id": "c1", "name": "Spin 45"}
            },
            "seat_label": null
        }))
        .expect("booking");

        let row = booking.row(&DisplayOptions::default());
        assert_eq!(row[1], "Ana Ruiz");
        assert_eq!(row[2], "Spin 45");
        assert_eq!(row[3], "2026-05-04 18:00");
        assert_eq!(row[4], "-");
        assert_eq!(booking.to_draft().get("session_id"), "s1");
    }

    #[rstest]
    fn missing_relations_render_dashes() {
        let booking: Booking =
            serde_json::from_value(json!({"id": "b2", "status": "CANCELLED"})).expect("booking");
        let row = booking.row(&DisplayOptions::default());
        assert_eq!(&row[1..4], ["-", "-", "-"]);
    }

    #[rstest]
    fn unchanged_edit_without_relations_sends_only_what_was_fetched() {
        let booking: Booking =
            serde_json::from_value(json!({"id": "b2", "status": "CANCELLED"})).expect("booking");
        let mut form = FormController::<Booking>::default();
        form.open_edit(&booking).expect("opens");

        let submission = form.begin_submit().expect("unchanged record is valid");
        assert_eq!(submission.body, json!({"status": "CANCELLED"}));
    }
}

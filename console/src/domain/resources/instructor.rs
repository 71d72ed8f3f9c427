//! Instructor profiles linked to user accounts.

use serde::Deserialize;

use super::{UserSummary, user_cell};
use crate::domain::display::{DisplayOptions, or_dash};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

/// Instructor record from `/api/instructors`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Instructor {
    pub id: ResourceId,
    #[serde(default)]
    pub user_id: Option<ResourceId>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl Instructor {
    /// Linked user id, from the flat column or the nested user.
    pub fn linked_user_id(&self) -> Option<&ResourceId> {
        self.user_id
            .as_ref()
            .or_else(|| self.user.as_ref().and_then(|user| user.id.as_ref()))
    }
}

impl Resource for Instructor {
    const NAME: &'static str = "instructor";
    const COLLECTION: &'static str = "instructors";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        user_cell(self.user.as_ref())
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("user_id", "User", FieldKind::Text).required(),
            FieldSpec::new("bio", "Bio", FieldKind::Text).clearable(),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with_opt("user_id", self.linked_user_id())
            .with_opt("bio", self.bio.as_deref())
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Specialties", "Photo"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        let specialties = if self.specialties.is_empty() {
            "-".to_owned()
        } else {
            self.specialties.join(", ")
        };
        vec![
            self.id.to_string(),
            user_cell(self.user.as_ref()),
            specialties,
            or_dash(self.photo_url.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn seeds_user_id_from_nested_user() {
        let instructor: Instructor = serde_json::from_value(json!({
            "id": "i1",
            "specialties": ["spin", "yoga"],
            "user": {"id": "u5", "email": "coach@studio.test"}
        }))
        .expect("instructor");
        assert_eq!(instructor.to_draft().get("user_id"), "u5");
        assert_eq!(
            instructor.row(&DisplayOptions::default())[1..3],
            ["coach@studio.test", "spin, yoga"]
        );
    }
}

//! Customer, instructor, and staff accounts.

use serde::Deserialize;

use crate::domain::display::{DisplayOptions, or_dash, yes_no};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const ROLES: &[&str] = &["ADMIN", "STAFF", "INSTRUCTOR", "CLIENT"];

/// User record from `/api/users`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub is_active: bool,
}

impl User {
    /// Full name, or the email when no name is on file.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.trim().is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

impl Resource for User {
    const NAME: &'static str = "user";
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        self.display_name()
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("email", "Email", FieldKind::Email).required(),
            FieldSpec::new("first_name", "First name", FieldKind::Text).clearable(),
            FieldSpec::new("last_name", "Last name", FieldKind::Text).clearable(),
            FieldSpec::new("role", "Role", FieldKind::Choice(ROLES)).required(),
            FieldSpec::new("phone", "Phone", FieldKind::Text).clearable(),
            FieldSpec::new("credits", "Credits", FieldKind::Integer),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("email", &self.email)
            .with_opt("first_name", self.first_name.as_deref())
            .with_opt("last_name", self.last_name.as_deref())
            .with("role", &self.role)
            .with_opt("phone", self.phone.as_deref())
            .with("credits", self.credits)
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Role", "Credits", "Phone", "Active"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.display_name(),
            self.email.clone(),
            self.role.clone(),
            self.credits.to_string(),
            or_dash(self.phone.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

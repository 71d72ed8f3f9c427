//! Studio-wide organization settings, edited in place.

use serde::Deserialize;

use crate::domain::display::{DisplayOptions, or_dash};
use crate::domain::resource::CollectionShape;
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

/// Settings object from `/api/organization`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Organization {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Resource for Organization {
    const NAME: &'static str = "organization";
    const COLLECTION: &'static str = "organization";
    const SHAPE: CollectionShape = CollectionShape::Singleton;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("email", "Contact email", FieldKind::Email).clearable(),
            FieldSpec::new("phone", "Phone", FieldKind::Text).clearable(),
            FieldSpec::new("currency", "Currency", FieldKind::Text),
            FieldSpec::new("timezone", "Time zone", FieldKind::Text),
            FieldSpec::new("logo_url", "Logo URL", FieldKind::Text).clearable(),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("name", &self.name)
            .with_opt("email", self.email.as_deref())
            .with_opt("phone", self.phone.as_deref())
            .with_opt("currency", self.currency.as_deref())
            .with_opt("timezone", self.timezone.as_deref())
            .with_opt("logo_url", self.logo_url.as_deref())
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Email", "Phone", "Currency", "Time zone"]
    }

    fn row(&self, _display: &DisplayOptions) -> Vec<String> {
        vec![
            self.name.clone(),
            or_dash(self.email.as_deref()),
            or_dash(self.phone.as_deref()),
            or_dash(self.currency.as_deref()),
            or_dash(self.timezone.as_deref()),
        ]
    }
}

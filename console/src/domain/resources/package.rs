//! Purchasable class packages.

use serde::Deserialize;

use super::Amount;
use crate::domain::display::{DisplayOptions, or_dash, yes_no};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const PACKAGE_TYPES: &[&str] = &["SINGLE_RIDE", "MULTI_RIDE", "UNLIMITED"];

/// Package record from `/api/packages`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Package {
    pub id: ResourceId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Amount,
    #[serde(default)]
    pub credits: Option<i64>,
    #[serde(default)]
    pub validity_days: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for Package {
    const NAME: &'static str = "package";
    const COLLECTION: &'static str = "packages";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("code", "Code", FieldKind::Text).required(),
            FieldSpec::new("name", "Name", FieldKind::Text).required(),
            FieldSpec::new("type", "Type", FieldKind::Choice(PACKAGE_TYPES)).required(),
            FieldSpec::new("price", "Price", FieldKind::Decimal).required(),
            FieldSpec::new("credits", "Credits", FieldKind::Integer).clearable(),
            FieldSpec::new("validity_days", "Validity (days)", FieldKind::Integer).clearable(),
            FieldSpec::new("description", "Description", FieldKind::Text).clearable(),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("code", &self.code)
            .with("name", &self.name)
            .with("type", &self.kind)
            .with("price", self.price)
            .with_opt("credits", self.credits)
            .with_opt("validity_days", self.validity_days)
            .with_opt("description", self.description.as_deref())
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Code", "Name", "Type", "Price", "Credits", "Valid days", "Active"]
    }

    fn row(&self, display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.kind.clone(),
            display.money(self.price.value()),
            or_dash(self.credits),
            or_dash(self.validity_days),
            yes_no(self.is_active),
        ]
    }
}

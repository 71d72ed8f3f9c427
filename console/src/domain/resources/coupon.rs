//! Discount coupons.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::Amount;
use crate::domain::display::{DisplayOptions, format_datetime, or_dash, yes_no};
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{Resource, ResourceId};

const DISCOUNT_TYPES: &[&str] = &["PERCENTAGE", "FIXED"];

/// Coupon record from `/api/coupons`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coupon {
    pub id: ResourceId,
    pub code: String,
    pub discount_type: String,
    pub discount_value: Amount,
    #[serde(default)]
    pub max_uses: Option<i64>,
    #[serde(default)]
    pub used_count: i64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

impl Coupon {
    fn discount_cell(&self, display: &DisplayOptions) -> String {
        if self.discount_type.eq_ignore_ascii_case("PERCENTAGE") {
            format!("{}%", self.discount_value)
        } else {
            display.money(self.discount_value.value())
        }
    }
}

impl Resource for Coupon {
    const NAME: &'static str = "coupon";
    const COLLECTION: &'static str = "coupons";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!("coupon {}", self.code)
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("code", "Code", FieldKind::Text).required(),
            FieldSpec::new("discount_type", "Discount type", FieldKind::Choice(DISCOUNT_TYPES))
                .required(),
            FieldSpec::new("discount_value", "Discount", FieldKind::Decimal).required(),
            FieldSpec::new("max_uses", "Max uses", FieldKind::Integer).clearable(),
            FieldSpec::new("expires_at", "Expires at", FieldKind::DateTime).clearable(),
            FieldSpec::new("is_active", "Active", FieldKind::Boolean),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with("code", &self.code)
            .with("discount_type", &self.discount_type)
            .with("discount_value", self.discount_value)
            .with_opt("max_uses", self.max_uses)
            .with_opt("expires_at", self.expires_at.map(|at| at.to_rfc3339()))
            .with("is_active", self.is_active)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Code", "Discount", "Used", "Expires", "Active"]
    }

    fn row(&self, display: &DisplayOptions) -> Vec<String> {
        let used = match self.max_uses {
            Some(max) => format!("{}/{max}", self.used_count),
            None => self.used_count.to_string(),
        };
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.discount_cell(display),
            used,
            or_dash(self.expires_at.as_ref().map(format_datetime)),
            yes_no(self.is_active),
        ]
    }
}

//! Package redemptions and the two sources of pending purchases.
//!
//! Pending purchases come from the redemption table
//! (`/api/redemptions/pending`) and from the order table
//! (`/api/orders/pending`). An order may carry a `redemption_id` pointing at
//! the redemption it produced; such pairs are shown once.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Amount, PackageSummary, UserSummary, user_cell};
use crate::domain::confirm::DestructiveKind;
use crate::domain::display::{DisplayOptions, format_datetime, or_dash, status_badge};
use crate::domain::reconcile::reconcile;
use crate::domain::schema::{Draft, FieldKind, FieldSchema, FieldSpec};
use crate::domain::{ApiPath, Resource, ResourceId};

const REDEMPTION_STATUSES: &[&str] = &["PENDING", "APPROVED", "REJECTED"];

/// Redemption record from `/api/redemptions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Redemption {
    pub id: ResourceId,
    pub status: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub package: Option<PackageSummary>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn package_name(package: Option<&PackageSummary>) -> String {
    or_dash(package.and_then(|package| package.name.as_deref()))
}

fn money_cell(amount: Option<Amount>, display: &DisplayOptions) -> String {
    or_dash(amount.map(|amount| display.money(amount.value())))
}

impl Resource for Redemption {
    const NAME: &'static str = "redemption";
    const COLLECTION: &'static str = "redemptions";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn label(&self) -> String {
        format!(
            "{} for {}",
            package_name(self.package.as_ref()),
            user_cell(self.user.as_ref())
        )
    }

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("user_id", "User", FieldKind::Text).required(),
            FieldSpec::new("package_id", "Package", FieldKind::Text).required(),
            FieldSpec::new("amount", "Amount", FieldKind::Decimal),
            FieldSpec::new("status", "Status", FieldKind::Choice(REDEMPTION_STATUSES)),
        ])
    }

    fn to_draft(&self) -> Draft {
        Draft::empty()
            .with_opt(
                "user_id",
                self.user.as_ref().and_then(|user| user.id.as_ref()),
            )
            .with_opt(
                "package_id",
                self.package.as_ref().and_then(|package| package.id.as_ref()),
            )
            .with_opt("amount", self.amount)
            .with("status", &self.status)
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Customer", "Package", "Amount", "Status", "Created"]
    }

    fn row(&self, display: &DisplayOptions) -> Vec<String> {
        vec![
            self.id.to_string(),
            user_cell(self.user.as_ref()),
            package_name(self.package.as_ref()),
            money_cell(self.amount, display),
            status_badge(&self.status),
            or_dash(self.created_at.as_ref().map(format_datetime)),
        ]
    }
}

/// Pending item from `/api/redemptions/pending`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingRedemption {
    pub id: ResourceId,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub package: Option<PackageSummary>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Pending item from `/api/orders/pending`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingOrder {
    pub order_id: ResourceId,
    #[serde(default)]
    pub redemption_id: Option<ResourceId>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub package: Option<PackageSummary>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the merged pending queue.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEntry {
    /// Sourced from the redemption table.
    Redemption(PendingRedemption),
    /// Sourced from the order table with no matching redemption.
    Order(PendingOrder),
}

impl PendingEntry {
    /// Identifier used for confirmation and removal.
    pub fn id(&self) -> &ResourceId {
        match self {
            Self::Redemption(item) => &item.id,
            Self::Order(item) => &item.order_id,
        }
    }

    /// Source name shown in the table.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Redemption(_) => "redemption",
            Self::Order(_) => "order",
        }
    }

    fn user(&self) -> Option<&UserSummary> {
        match self {
            Self::Redemption(item) => item.user.as_ref(),
            Self::Order(item) => item.user.as_ref(),
        }
    }

    fn package(&self) -> Option<&PackageSummary> {
        match self {
            Self::Redemption(item) => item.package.as_ref(),
            Self::Order(item) => item.package.as_ref(),
        }
    }

    fn amount(&self) -> Option<Amount> {
        match self {
            Self::Redemption(item) => item.amount,
            Self::Order(item) => item.amount,
        }
    }

    /// Label naming the purchase in confirmations.
    pub fn label(&self) -> String {
        format!(
            "{} {} for {}",
            self.source(),
            package_name(self.package()),
            user_cell(self.user())
        )
    }

    /// Member action endpoint, e.g. `/api/orders/{id}/approve`.
    pub fn action_path(&self, kind: DestructiveKind) -> ApiPath {
        let collection = match self {
            Self::Redemption(_) => "redemptions",
            Self::Order(_) => "orders",
        };
        ApiPath::api()
            .join(collection)
            .join_id(self.id())
            .join(kind.verb())
    }

    /// Table headings for the pending queue.
    pub fn columns() -> &'static [&'static str] {
        &["ID", "Source", "Customer", "Package", "Amount", "Receipt"]
    }

    /// Table cells for this entry.
    pub fn row(&self, display: &DisplayOptions) -> Vec<String> {
        let receipt = match self {
            Self::Redemption(item) => or_dash(item.receipt_url.as_deref()),
            Self::Order(_) => "-".to_owned(),
        };
        vec![
            self.id().to_string(),
            self.source().to_owned(),
            user_cell(self.user()),
            package_name(self.package()),
            money_cell(self.amount(), display),
            receipt,
        ]
    }
}

/// Merged pending queue and the distinct count shown in the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingSnapshot {
    /// Rows in display order: redemptions, then unmatched orders.
    pub entries: Vec<PendingEntry>,
    /// Number of distinct logical purchases.
    pub count: usize,
}

/// Merge both pending sources so each purchase appears once.
///
/// The count always equals the number of rendered entries.
pub fn reconcile_pending(
    redemptions: &[PendingRedemption],
    orders: &[PendingOrder],
) -> PendingSnapshot {
    let merged = reconcile(
        redemptions,
        orders,
        |item| item.id.to_string(),
        |order| order.order_id.to_string(),
        |order| order.redemption_id.as_ref().map(ToString::to_string),
    );
    let mut seen_redemptions = BTreeSet::new();
    let mut entries: Vec<PendingEntry> = redemptions
        .iter()
        .filter(|item| seen_redemptions.insert(item.id.clone()))
        .cloned()
        .map(PendingEntry::Redemption)
        .collect();
    entries.extend(
        merged
            .accepted_b()
            .iter()
            .filter_map(|index| orders.get(*index))
            .cloned()
            .map(PendingEntry::Order),
    );
    PendingSnapshot {
        count: merged.count(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pending queue merge.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn redemption(id: &str) -> PendingRedemption {
        serde_json::from_value(json!({"id": id, "amount": "500"})).expect("redemption")
    }

    fn order(id: &str, redemption_id: Option<&str>) -> PendingOrder {
        serde_json::from_value(json!({"order_id": id, "redemption_id": redemption_id}))
            .expect("order")
    }

    #[rstest]
    fn cross_referenced_orders_are_counted_once() {
        let snapshot = reconcile_pending(
            &[redemption("a1"), redemption("a2")],
            &[order("a1", None), order("b1", Some("a2"))],
        );
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.entries.len(), 2);
        assert!(
            snapshot
                .entries
                .iter()
                .all(|entry| matches!(entry, PendingEntry::Redemption(_)))
        );
    }

    #[rstest]
    fn unmatched_orders_follow_redemptions() {
        let snapshot = reconcile_pending(&[redemption("a1")], &[order("o9", Some("r-missing"))]);
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.entries[1].id().as_ref(), "o9");
        assert_eq!(snapshot.entries[1].source(), "order");
    }

    #[rstest]
    fn action_paths_follow_the_source() {
        let entry = PendingEntry::Order(order("o1", None));
        assert_eq!(
            entry.action_path(DestructiveKind::Approve).as_str(),
            "/api/orders/o1/approve"
        );
        let entry = PendingEntry::Redemption(redemption("r1"));
        assert_eq!(
            entry.action_path(DestructiveKind::Reject).as_str(),
            "/api/redemptions/r1/reject"
        );
    }
}

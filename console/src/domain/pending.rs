//! Approval queue for pending package purchases.
//!
//! The queue merges `/api/redemptions/pending` (primary) with
//! `/api/orders/pending` (secondary) through [`reconcile_pending`]. The two
//! fetches run concurrently; an orders failure only hides the unmatched
//! orders, while a redemptions failure shows the error banner.

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::confirm::{ConfirmationGate, DestructiveKind, PendingAction};
use crate::domain::controller::{ListState, ResourceContext, decode_rows};
use crate::domain::ports::Notification;
use crate::domain::resources::{PendingEntry, PendingOrder, PendingRedemption, reconcile_pending};
use crate::domain::{ApiPath, Error, ResourceId};

const REDEMPTIONS_PENDING: &str = "redemptions/pending";
const ORDERS_PENDING: &str = "orders/pending";

async fn fetch_source<T: DeserializeOwned>(
    ctx: &ResourceContext,
    segment: &str,
) -> Result<Vec<T>, Error> {
    let payload = ctx.get(&ApiPath::api().join(segment), None).await?;
    decode_rows(segment, payload)
}

/// Pending purchases awaiting approval or rejection.
pub struct PendingQueue {
    ctx: ResourceContext,
    list: ListState<PendingEntry>,
    gate: ConfirmationGate,
}

impl PendingQueue {
    /// Queue bound to an established session.
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            list: ListState::Loading,
            gate: ConfirmationGate::default(),
        }
    }

    /// Injected collaborators.
    pub fn context(&self) -> &ResourceContext {
        &self.ctx
    }

    /// Merged rows.
    pub fn list(&self) -> &ListState<PendingEntry> {
        &self.list
    }

    /// Distinct pending purchases currently shown.
    pub fn count(&self) -> usize {
        self.list.rows().len()
    }

    /// Staged approval or rejection.
    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    /// Fetch both sources concurrently and merge them.
    pub async fn load(&mut self) {
        self.list = ListState::Loading;
        let (redemptions, orders) = futures_util::join!(
            fetch_source::<PendingRedemption>(&self.ctx, REDEMPTIONS_PENDING),
            fetch_source::<PendingOrder>(&self.ctx, ORDERS_PENDING),
        );
        let orders = orders.unwrap_or_else(|error| {
            warn!(code = ?error.code(), %error, "pending orders unavailable; showing redemptions only");
            Vec::new()
        });
        let outcome = redemptions.map(|redemptions| {
            let snapshot = reconcile_pending(&redemptions, &orders);
            info!(count = snapshot.count, "pending queue loaded");
            snapshot.entries
        });
        if let Err(error) = &outcome {
            warn!(code = ?error.code(), %error, "pending redemptions fetch failed");
        }
        self.list = ListState::from_outcome(outcome);
    }

    /// Stage an approval or rejection of the loaded entry `id`.
    ///
    /// # Errors
    ///
    /// Fails for `Delete`, or when the entry is not loaded.
    pub fn request(&mut self, kind: DestructiveKind, id: &ResourceId) -> Result<String, Error> {
        if kind == DestructiveKind::Delete {
            return Err(Error::invalid_request(
                "pending purchases can only be approved or rejected",
            ));
        }
        let entry = self
            .list
            .rows()
            .iter()
            .find(|entry| entry.id() == id)
            .ok_or_else(|| Error::not_found(format!("pending purchase {id} is not in the queue")))?;
        Ok(self.gate.request(PendingAction {
            kind,
            target_id: id.clone(),
            target_label: entry.label(),
        }))
    }

    /// Drop the staged action.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.gate.cancel()
    }

    /// Execute the staged action once the operator repeats its target id.
    ///
    /// The entry is removed on success; approvals also refetch the queue.
    ///
    /// # Errors
    ///
    /// Returns the confirmation or API error.
    pub async fn confirm(&mut self, confirmed_id: &ResourceId) -> Result<(), Error> {
        let action = self
            .gate
            .confirm(confirmed_id)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let path = self
            .list
            .rows()
            .iter()
            .find(|entry| entry.id() == &action.target_id)
            .map(|entry| entry.action_path(action.kind))
            .ok_or_else(|| {
                Error::not_found(format!(
                    "pending purchase {} left the queue",
                    action.target_id
                ))
            })?;
        match self.ctx.post(&path, &json!({})).await {
            Ok(_) => {
                info!(id = %action.target_id, action = action.kind.verb(), "pending purchase resolved");
                self.list.remove_where(|entry| entry.id() == &action.target_id);
                self.ctx.notify(Notification::success(format!(
                    "Purchase {}",
                    action.kind.past_tense()
                )));
                if action.kind == DestructiveKind::Approve {
                    self.load().await;
                }
                Ok(())
            }
            Err(error) => {
                self.ctx.notify(Notification::error(error.message()));
                Err(error)
            }
        }
    }
}

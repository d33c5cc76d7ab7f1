//! Subscription billing.
//!
//! Per-user state machine: `NONE -> ACTIVE -> {CANCELLED, upgraded}`.
//! Activation cancels any prior active record inside the same transaction,
//! so at most one ACTIVE subscription exists per user (the partial unique
//! index in the schema backs the same invariant).

use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use lancer_core::errors::{MarketError, MarketResult, StorageError};
use lancer_core::plan::FREE_MONTHLY_BIDS;
use lancer_core::types::subscription::{Subscription, SubscriptionStatus};
use lancer_core::types::wallet::TransactionKind;
use lancer_core::{Money, SubscriptionPlan, UserId};
use lancer_storage::queries::subscriptions::{self, NewSubscription};
use lancer_storage::queries::{bids, users};
use lancer_storage::MarketStore;

use crate::ledger;

pub struct SubscriptionManager {
    store: Arc<MarketStore>,
    cycle_months: u32,
}

impl SubscriptionManager {
    pub fn new(store: Arc<MarketStore>, cycle_months: u32) -> Self {
        Self { store, cycle_months }
    }

    /// Activate (or upgrade to) `plan` for `user`.
    ///
    /// Cancels any prior active subscription, computes the price from the
    /// plan table, and generates a fresh invoice number and transaction id.
    /// Paid plans get a record-only SUBSCRIPTION trail entry; the wallet
    /// balance is untouched because payment is settled externally.
    pub fn activate(
        &self,
        user: UserId,
        plan: SubscriptionPlan,
        payment_method: Option<&str>,
        auto_renew: bool,
    ) -> MarketResult<Subscription> {
        let cycle_months = self.cycle_months;
        self.store.with_tx(|conn| {
            users::get(conn, user)?.ok_or(MarketError::not_found("user", user.raw()))?;
            subscriptions::cancel_active(conn, user)?;

            let price = plan.monthly_price();
            let start = Utc::now().date_naive();
            let invoice_number = new_invoice_number(start);
            let transaction_id = new_transaction_id();

            let id = subscriptions::insert(
                conn,
                &NewSubscription {
                    user,
                    plan,
                    payment_method,
                    amount_paid: price,
                    auto_renew,
                    start_date: start,
                    next_billing_date: next_billing(start, cycle_months),
                    invoice_number: &invoice_number,
                    transaction_id: &transaction_id,
                },
            )?;

            if !price.is_zero() {
                ledger::record_tx(
                    conn,
                    user,
                    price,
                    TransactionKind::Subscription,
                    &format!("{} plan subscription {invoice_number}", plan.display_name()),
                )?;
            }

            info!(user = %user, plan = plan.as_str(), %invoice_number, "subscription activated");
            subscriptions::get(conn, id)?
                .ok_or_else(|| StorageError::corrupt("subscriptions", "insert vanished").into())
        })
    }

    /// Cancel the active subscription, if any. No-op otherwise.
    pub fn cancel(&self, user: UserId) -> MarketResult<()> {
        self.store.with_tx(|conn| {
            let changed = subscriptions::cancel_active(conn, user)?;
            if changed > 0 {
                info!(user = %user, "subscription cancelled");
            }
            Ok(())
        })
    }

    /// Grace period expired: back to the free tier.
    pub fn downgrade_to_free(&self, user: UserId) -> MarketResult<()> {
        // The free tier has no subscription record; quota resets via the
        // plan table.
        self.cancel(user)
    }

    /// The user's active subscription, if any.
    pub fn find_active(&self, user: UserId) -> MarketResult<Option<Subscription>> {
        self.store.active_subscription(user)
    }

    /// Whether the user has bid allowance left this cycle.
    pub fn can_bid(&self, user: UserId) -> MarketResult<bool> {
        Ok(self.store.with_read(|conn| quota_usage(conn, user))?.is_none())
    }

    /// Commission rate applied at settlement, in basis points.
    /// Defaults to the FREE rate when no subscription is active.
    pub fn commission_bps(&self, user: UserId) -> MarketResult<u32> {
        self.store
            .with_read(|conn| commission_bps_tx(conn, user))
            .map_err(MarketError::Storage)
    }

    // ─── Admin analytics ─────────────────────────────────────

    pub fn count_active(&self) -> MarketResult<u64> {
        self.store.count_subscriptions(SubscriptionStatus::Active)
    }

    pub fn count_cancelled(&self) -> MarketResult<u64> {
        self.store.count_subscriptions(SubscriptionStatus::Cancelled)
    }

    pub fn count_by_plan(&self, plan: SubscriptionPlan) -> MarketResult<u64> {
        self.store.count_active_by_plan(plan)
    }

    pub fn monthly_revenue(&self) -> MarketResult<Money> {
        self.store.monthly_revenue()
    }

    pub fn list_failed(&self) -> MarketResult<Vec<Subscription>> {
        self.store.subscriptions_by_status(SubscriptionStatus::Failed)
    }
}

fn next_billing(start: NaiveDate, cycle_months: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(cycle_months))
        .unwrap_or(start)
}

/// `TR-<year>-<token>`: opaque, collision-resistant within a process run.
fn new_invoice_number(date: NaiveDate) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("TR-{}-{}", date.year(), token[..8].to_uppercase())
}

/// `TXN-<token>`.
fn new_transaction_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("TXN-{}", token[..12].to_uppercase())
}

/// First instant of the current calendar month, RFC 3339. The free tier
/// counts bids against this window since it has no subscription row.
fn cycle_start_rfc3339() -> String {
    let now = Utc::now();
    format!("{:04}-{:02}-01T00:00:00+00:00", now.year(), now.month())
}

/// Quota check within an open transaction. `None` means one more bid is
/// allowed right now; `Some((used, quota))` means the cycle allowance is
/// spent. Callers decide whether that is an error or just `false`.
pub(crate) fn quota_usage(
    conn: &Connection,
    user: UserId,
) -> Result<Option<(u32, u32)>, StorageError> {
    match subscriptions::find_active(conn, user)? {
        Some(sub) => match sub.plan.monthly_bids() {
            None => Ok(None),
            Some(quota) if sub.bids_used_this_cycle < quota => Ok(None),
            Some(quota) => Ok(Some((sub.bids_used_this_cycle, quota))),
        },
        None => {
            let used = bids::count_for_freelancer_since(conn, user, &cycle_start_rfc3339())?;
            if used < FREE_MONTHLY_BIDS {
                Ok(None)
            } else {
                Ok(Some((used, FREE_MONTHLY_BIDS)))
            }
        }
    }
}

/// Consume one bid from the active subscription's allowance, if there is
/// one. Free-tier usage is derived from the bids table itself.
pub(crate) fn consume_bid_tx(conn: &Connection, user: UserId) -> Result<(), MarketError> {
    if let Some(sub) = subscriptions::find_active(conn, user)? {
        subscriptions::increment_bids_used(conn, sub.id)?;
    }
    Ok(())
}

/// Commission rate lookup within an open transaction.
pub(crate) fn commission_bps_tx(conn: &Connection, user: UserId) -> Result<u32, StorageError> {
    Ok(subscriptions::find_active(conn, user)?
        .map(|sub| sub.plan.commission_bps())
        .unwrap_or_else(|| SubscriptionPlan::Free.commission_bps()))
}

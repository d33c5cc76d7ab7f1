//! Subscription records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{SubscriptionId, UserId};
use super::money::Money;
use crate::plan::SubscriptionPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Failed,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Cancelled => "CANCELLED",
            SubscriptionStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(SubscriptionStatus::Active),
            "CANCELLED" => Some(SubscriptionStatus::Cancelled),
            "FAILED" => Some(SubscriptionStatus::Failed),
            _ => None,
        }
    }
}

/// One billing-cycle subscription record.
///
/// At most one `Active` subscription exists per user at any time; the
/// activation path cancels any prior active record in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user: UserId,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub payment_method: Option<String>,
    pub amount_paid: Money,
    pub auto_renew: bool,
    pub start_date: NaiveDate,
    pub next_billing_date: NaiveDate,
    pub bids_used_this_cycle: u32,
    pub invoice_number: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

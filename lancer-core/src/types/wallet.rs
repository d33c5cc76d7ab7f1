//! Wallet transaction trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::UserId;
use super::money::Money;

/// Transaction kinds in the wallet trail.
///
/// `Credit` and `Debit` move the balance. `Subscription` and `Commission`
/// are record-only entries: subscription charges are settled externally and
/// commission is accounted for by never crediting it to the freelancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Credit,
    Debit,
    Subscription,
    Commission,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
            TransactionKind::Subscription => "SUBSCRIPTION",
            TransactionKind::Commission => "COMMISSION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREDIT" => Some(TransactionKind::Credit),
            "DEBIT" => Some(TransactionKind::Debit),
            "SUBSCRIPTION" => Some(TransactionKind::Subscription),
            "COMMISSION" => Some(TransactionKind::Commission),
            _ => None,
        }
    }

    /// Sign applied when reconciling the balance against the trail.
    /// Record-only kinds contribute zero.
    pub fn sign(self) -> i64 {
        match self {
            TransactionKind::Credit => 1,
            TransactionKind::Debit => -1,
            TransactionKind::Subscription | TransactionKind::Commission => 0,
        }
    }
}

/// An immutable ledger entry. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: i64,
    pub user: UserId,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

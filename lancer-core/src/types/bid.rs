//! Bids and the bid state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{BidId, ProjectId, UserId};
use super::money::Money;

/// Bid lifecycle. A bid is created `Pending`; acceptance and rejection are
/// applied atomically with the project assignment; `Withdrawn` is only
/// reachable from `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl BidStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BidStatus::Pending => "PENDING",
            BidStatus::Accepted => "ACCEPTED",
            BidStatus::Rejected => "REJECTED",
            BidStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BidStatus::Pending),
            "ACCEPTED" => Some(BidStatus::Accepted),
            "REJECTED" => Some(BidStatus::Rejected),
            "WITHDRAWN" => Some(BidStatus::Withdrawn),
            _ => None,
        }
    }
}

/// A freelancer's offer on a project.
///
/// At most one non-withdrawn bid may exist per (project, freelancer) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub project: ProjectId,
    pub freelancer: UserId,
    pub amount: Money,
    pub delivery_days: u32,
    pub proposal: String,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

/// A bid prior to insertion.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub project: ProjectId,
    pub freelancer: UserId,
    pub amount: Money,
    pub delivery_days: u32,
    pub proposal: String,
}

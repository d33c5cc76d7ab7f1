//! Milestones: priced, ordered deliverable checkpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{MilestoneId, ProjectId};
use super::money::Money;

/// Milestone lifecycle. `Approved` is terminal and triggers settlement
/// exactly once. A `Rejected` milestone may be resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl MilestoneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "PENDING",
            MilestoneStatus::Submitted => "SUBMITTED",
            MilestoneStatus::Approved => "APPROVED",
            MilestoneStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MilestoneStatus::Pending),
            "SUBMITTED" => Some(MilestoneStatus::Submitted),
            "APPROVED" => Some(MilestoneStatus::Approved),
            "REJECTED" => Some(MilestoneStatus::Rejected),
            _ => None,
        }
    }
}

/// A deliverable checkpoint within a project.
///
/// `order_index` is 1-based, assigned at creation time per project, and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub project: ProjectId,
    pub title: String,
    pub amount: Money,
    pub order_index: u32,
    pub status: MilestoneStatus,
    pub client_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

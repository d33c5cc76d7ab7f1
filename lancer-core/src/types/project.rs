//! Projects and the project state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{ProjectId, UserId};
use super::money::Money;

/// Project lifecycle.
///
/// `Open --(bid accepted)--> InProgress --(all milestones approved or
/// explicit completion)--> Completed`. `Cancelled` is terminal and reachable
/// from `Open` or `InProgress`. Nothing leaves `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Open => "OPEN",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(ProjectStatus::Open),
            "IN_PROGRESS" => Some(ProjectStatus::InProgress),
            "COMPLETED" => Some(ProjectStatus::Completed),
            "CANCELLED" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }
}

/// A posted project. Bids and milestones reference it by id and share its
/// lifetime (both are removed when the project row is deleted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub client: UserId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub skills_required: Option<String>,
    pub budget_min: Money,
    pub budget_max: Money,
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub assigned_freelancer: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// A project prior to insertion.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub skills_required: Option<String>,
    pub budget_min: Money,
    pub budget_max: Money,
    pub deadline: Option<NaiveDate>,
}

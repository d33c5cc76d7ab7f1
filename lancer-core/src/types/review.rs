//! Reviews left after working together on a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{ProjectId, ReviewId, UserId};

/// A 1-5 star review of one user by another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub reviewer: UserId,
    pub reviewee: UserId,
    pub project: Option<ProjectId>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

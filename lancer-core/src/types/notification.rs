//! Notification records for the external notification store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{NotificationId, UserId};

/// A single "notify user" event emitted by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user: UserId,
    pub title: String,
    pub body: String,
    /// Category tag, e.g. `PROJECT_MATCH`.
    pub kind: String,
    /// Deep link into the consuming UI.
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

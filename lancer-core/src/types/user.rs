//! Users: wallet owners, bidders, and project owners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::UserId;
use super::money::Money;

/// Closed set of account roles. Capability checks go through
/// `crate::policy`, never through scattered role conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Client,
    Freelancer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Freelancer => "FREELANCER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CLIENT" => Some(Role::Client),
            "FREELANCER" => Some(Role::Freelancer),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A registered account.
///
/// `wallet_balance` is owned by the ledger: no other component writes it.
/// `performance_score` is bounded to [0, 10] and starts at 5.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub skills: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Money,
    pub wallet_balance: Money,
    pub performance_score: f64,
    pub completed_projects: u32,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upper bound for performance scores.
pub const MAX_PERFORMANCE_SCORE: f64 = 10.0;

/// Score assigned to every freshly registered user.
pub const INITIAL_PERFORMANCE_SCORE: f64 = 5.0;

/// A new account prior to insertion (no id yet).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub skills: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub hourly_rate: Money,
}

//! Top-level error type for the marketplace engine.
//!
//! Every public engine operation returns `MarketResult<T>`. Domain failures
//! are deterministic given current state; nothing here is retried.

use super::StorageError;

/// Top-level error type. Subsystem errors convert into this via `From`.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid transition: {entity} {id} is {from}, cannot {action}")]
    InvalidTransition {
        entity: &'static str,
        id: i64,
        from: String,
        action: &'static str,
    },

    #[error("freelancer {freelancer} already has an open bid on project {project}")]
    DuplicateBid { project: i64, freelancer: i64 },

    #[error("bid quota exhausted for the current cycle ({used}/{quota})")]
    BidQuotaExceeded { used: u32, quota: u32 },

    #[error("insufficient funds: balance {balance} cents, needed {needed} cents")]
    InsufficientFunds { balance: i64, needed: i64 },

    #[error("unknown subscription plan: {name}")]
    InvalidPlan { name: String },

    #[error("{field} already taken: {value}")]
    AlreadyExists { field: &'static str, value: String },

    #[error("role {role} may not {action}")]
    Forbidden { role: &'static str, action: &'static str },

    #[error("invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("invalid rating: {rating} (must be 1-5)")]
    InvalidRating { rating: i32 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias.
pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

//! Per-table query modules.
//!
//! Every function takes a `&Connection` so it composes the same way inside
//! a transaction (via `ConnectionManager::with_tx`) and outside one.

pub mod bids;
pub mod milestones;
pub mod notifications;
pub mod projects;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod wallet;

use chrono::{DateTime, NaiveDate, Utc};

use lancer_core::errors::StorageError;
use lancer_core::types::money::Money;

/// Current wall-clock timestamp, stored as RFC 3339.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub(crate) fn decode_timestamp(table: &str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::corrupt(table, format!("bad timestamp {raw:?}: {e}")))
}

pub(crate) fn decode_date(table: &str, raw: &str) -> Result<NaiveDate, StorageError> {
    raw.parse::<NaiveDate>()
        .map_err(|e| StorageError::corrupt(table, format!("bad date {raw:?}: {e}")))
}

pub(crate) fn decode_money(table: &str, cents: i64) -> Result<Money, StorageError> {
    Money::from_cents(cents)
        .ok_or_else(|| StorageError::corrupt(table, format!("negative amount {cents}")))
}
